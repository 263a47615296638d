use taskflow::output::{format_human, HumanOutput};

#[test]
fn header_only_output_has_no_sections() {
    let output = HumanOutput::new("3 task(s)");
    assert_eq!(format_human(&output), "3 task(s)");
}

#[test]
fn summary_and_details_are_sectioned() {
    let mut output = HumanOutput::new("Created task t1");
    output.push_summary("title", "Ship it");
    output.push_summary("priority", "High");
    output.push_detail("t1  [High] [To Do] (-)  Ship it");

    let text = format_human(&output);
    let expected = "Created task t1\n\
                    \n\
                    Summary:\n\
                    - title: Ship it\n\
                    - priority: High\n\
                    \n\
                    Details:\n\
                    - t1  [High] [To Do] (-)  Ship it";
    assert_eq!(text, expected);
}

#[test]
fn empty_summary_value_renders_key_only() {
    let mut output = HumanOutput::new("Done");
    output.push_summary("reloaded", "");

    let text = format_human(&output);
    assert!(text.contains("- reloaded"));
    assert!(!text.contains("- reloaded:"));
}

#[test]
fn warnings_and_next_steps_render_last() {
    let mut output = HumanOutput::new("Moved t1 to Doing");
    output.push_warning("server renumbered the pipeline");
    output.push_next_step("tf board --snapshot");

    let text = format_human(&output);
    let warnings_at = text.find("Warnings:").expect("warnings section");
    let next_at = text.find("Next steps:").expect("next steps section");
    assert!(warnings_at < next_at);
    assert!(text.ends_with("- tf board --snapshot"));
}
