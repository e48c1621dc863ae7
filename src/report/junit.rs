use super::types::TestResults;
use crate::runner::state::{Outcome, OutcomeStatus};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

fn seconds(duration_ms: u64) -> String {
    (duration_ms as f64 / 1000.0).to_string()
}

/// Generate JUnit XML report string from TestResults
pub fn generate_junit_xml(results: &TestResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let summary = &results.summary;
    let tests = summary.total.to_string();
    let failures = summary.failed.to_string();
    let errors = summary.errors.to_string();
    let time = seconds(summary.total_duration_ms);

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "booker-probe-run"));
    suites_start.push_attribute(("tests", tests.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("errors", errors.as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    // One suite per run, named after the target
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", results.base_url.as_str()));
    suite_start.push_attribute(("tests", tests.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("errors", errors.as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for outcome in &results.outcomes {
        write_test_case(&mut writer, outcome)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(writer: &mut Writer<W>, outcome: &Outcome) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", outcome.test_name.as_str()));
    case_start.push_attribute(("classname", "booking-api"));
    case_start.push_attribute(("time", seconds(outcome.duration_ms).as_str()));
    writer.write_event(Event::Start(case_start))?;

    let element = match outcome.status {
        OutcomeStatus::Passed => None,
        OutcomeStatus::Failed => Some(("failure", "UnexpectedStatus")),
        OutcomeStatus::Error => Some(("error", "TransportFault")),
    };

    if let Some((tag, kind)) = element {
        let mut start = BytesStart::new(tag);
        start.push_attribute(("message", outcome.message.as_str()));
        start.push_attribute(("type", kind));
        writer.write_event(Event::Start(start))?;
        if let Some(body) = &outcome.response_body {
            writer.write_event(Event::Text(BytesText::new(body)))?;
        }
        writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}
