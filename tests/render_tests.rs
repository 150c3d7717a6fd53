use bbmark::{BbCode, TagDef, TagSet};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
struct RenderTest {
    section: String,
    input: String,
    output: String,
}

fn harness_tags() -> TagSet {
    TagSet::new()
        .with("b", "<strong>{content}</strong>")
        .with("i", "<em>{content}</em>")
        .with("u", "<u>{content}</u>")
        .with("url", "<a href=\"{option}\">{content}</a>")
        .with("color", "<span style=\"color: {option}\">{content}</span>")
        .with(
            "img",
            TagDef::template("<img src=\"{attribute.src}\" alt=\"{attribute.alt}\" />")
                .self_closing(),
        )
        .with("code", TagDef::template("<pre>{content}</pre>").no_code())
        .with("hr", TagDef::template("<hr />").self_closing())
}

#[test]
fn render_test_cases() {
    let test_data = fs::read_to_string("tests/data/tests.json").expect("Failed to read tests.json");

    let tests: Vec<RenderTest> =
        serde_json::from_str(&test_data).expect("Failed to parse tests.json");

    let processor = BbCode::new(harness_tags());
    let mut failures = Vec::new();

    for test in &tests {
        let result = processor.render(&test.input);
        if result != test.output {
            failures.push(test.section.clone());
            eprintln!("\nCase '{}' failed", test.section);
            eprintln!("  Input: {:?}", test.input);
            eprintln!("  Expected: {:?}", test.output);
            eprintln!("  Got: {:?}", result);
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} cases failed: {:?}",
        failures.len(),
        tests.len(),
        failures
    );
}

#[test]
fn shared_processor_across_threads() {
    // The configuration is read-only after construction; one processor may
    // serve concurrent render calls.
    let processor = BbCode::new(harness_tags());
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let shared = &processor;
            let _ = scope.spawn(move || {
                assert_eq!(shared.render("[b]x[/b]"), "<strong>x</strong>");
                assert_eq!(shared.render("[i]y"), "[i]y");
            });
        }
    });
}

#[test]
fn callback_handler_sees_rendered_content() {
    let processor = BbCode::new(
        TagSet::new()
            .with("b", "<strong>{content}</strong>")
            .with(
                "spoiler",
                TagDef::callback(|tag| format!("<details>{}</details>", tag.content())),
            ),
    );
    assert_eq!(
        processor.render("[spoiler][b]x[/b][/spoiler]"),
        "<details><strong>x</strong></details>"
    );
}

#[test]
fn callback_handler_sees_raw_source() {
    let processor = BbCode::new(
        TagSet::new()
            .with("b", "<strong>{content}</strong>")
            .with(
                "raw",
                TagDef::callback(|tag| tag.source().to_string()),
            ),
    );
    assert_eq!(processor.render("[raw][b]x[/b][/raw]"), "[b]x[/b]");
}
