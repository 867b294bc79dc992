// File: tests/normalizer_tests.rs
use chrono::NaiveDate;
use txt2ics::model::{
    DateType, Diagnostic, Normalized, ParseError, Rejection, TagKind, TagValue, TaskStatus,
    TypedTag, normalize,
};

fn run(remainder: &str) -> (Normalized, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let normalized = normalize(remainder, &mut diagnostics).unwrap();
    (normalized, diagnostics)
}

fn all_day(y: i32, m: u32, d: u32) -> DateType {
    DateType::AllDay(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

#[test]
fn test_tags_and_markers() {
    let (n, diags) = run("Call Bob due:2024-01-15 +errands @phone");

    assert_eq!(n.summary, "Call Bob");
    assert_eq!(
        n.tags,
        vec![TypedTag {
            kind: TagKind::Due,
            value: TagValue::Date(all_day(2024, 1, 15)),
        }]
    );
    assert_eq!(n.categories, vec!["errands".to_string()]);
    assert_eq!(n.resources, vec!["phone".to_string()]);
    assert_eq!(n.description, None);
    assert!(diags.is_empty());
}

#[test]
fn test_description_is_taken_first() {
    let (n, _) = run("Read book // chapter 3 first");
    assert_eq!(n.summary, "Read book");
    assert_eq!(n.description, Some("chapter 3 first".to_string()));

    // Tags inside the description are part of the description.
    let (n, _) = run("Deploy // see due:2024-01-01 +ops");
    assert_eq!(n.summary, "Deploy");
    assert_eq!(n.description, Some("see due:2024-01-01 +ops".to_string()));
    assert!(n.tags.is_empty());
    assert!(n.categories.is_empty());
}

#[test]
fn test_empty_description_marker() {
    let (n, _) = run("Sweep floor //");
    assert_eq!(n.summary, "Sweep floor");
    assert_eq!(n.description, None);
}

#[test]
fn test_urls_are_not_tags_or_descriptions() {
    let (n, diags) = run("Check http://example.com/a:b later");
    assert_eq!(n.summary, "Check http://example.com/a:b later");
    assert_eq!(n.description, None);
    assert!(n.tags.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_unknown_tag_is_reported_and_kept() {
    let (n, diags) = run("Ping team assignee:alice");
    assert_eq!(n.summary, "Ping team assignee:alice");
    assert!(n.tags.is_empty());
    assert_eq!(
        diags,
        vec![Diagnostic::UnknownTagKey {
            key: "assignee".to_string(),
            value: "alice".to_string(),
        }]
    );
}

#[test]
fn test_clock_times_look_like_unknown_tags() {
    let (n, diags) = run("Meet at 10:30");
    assert_eq!(n.summary, "Meet at 10:30");
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_bad_date_tag_is_dropped_and_kept_in_summary() {
    let (n, diags) = run("Renew passport due:someday");
    assert_eq!(n.summary, "Renew passport due:someday");
    assert!(n.tags.is_empty());
    assert_eq!(
        diags,
        vec![Diagnostic::DroppedField {
            field: "due",
            error: ParseError::UnparseableDate("someday".to_string()),
        }]
    );
}

#[test]
fn test_status_tag() {
    let (n, _) = run("Water plants status:done");
    assert_eq!(n.summary, "Water plants");
    assert_eq!(
        n.tags,
        vec![TypedTag {
            kind: TagKind::Status,
            value: TagValue::Status(TaskStatus::Completed),
        }]
    );
}

#[test]
fn test_empty_parse_results_stay_in_summary() {
    // "todo" parses to the empty status, which does not authorize stripping.
    let (n, diags) = run("Water plants status:todo");
    assert_eq!(n.summary, "Water plants status:todo");
    assert!(n.tags.is_empty());
    assert!(diags.is_empty());

    // An empty category list behaves the same way.
    let (n, diags) = run("Sort photos categories:,");
    assert_eq!(n.summary, "Sort photos categories:,");
    assert!(n.tags.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_unknown_status_tag_rejects() {
    let mut diags = Vec::new();
    assert_eq!(
        normalize("Renew status:bogus", &mut diags),
        Err(Rejection::UnrecognizedStatus("bogus".to_string()))
    );
}

#[test]
fn test_tag_values_are_not_reextracted_as_markers() {
    let (n, _) = run("Plan trip categories:+travel,fun location:@home");
    assert_eq!(n.summary, "Plan trip");
    assert!(n.categories.is_empty());
    assert!(n.resources.is_empty());
    assert_eq!(
        n.tags,
        vec![
            TypedTag {
                kind: TagKind::Categories,
                value: TagValue::List(vec!["+travel".to_string(), "fun".to_string()]),
            },
            TypedTag {
                kind: TagKind::Location,
                value: TagValue::Text("@home".to_string()),
            },
        ]
    );
}

#[test]
fn test_tag_at_start_of_remainder() {
    let (n, _) = run("due:2024-01-01 Pay bills");
    assert_eq!(n.summary, "Pay bills");
    assert_eq!(n.tags.len(), 1);
}

#[test]
fn test_each_occurrence_stripped_once() {
    // The first value is a prefix of the second; neither may be half-removed.
    let (n, _) = run("Move due:2024-01-01 and due:2024-01-01T08:00");
    assert_eq!(n.summary, "Move and");
    assert_eq!(n.tags.len(), 2);
    assert_eq!(n.tags[0].value, TagValue::Date(all_day(2024, 1, 1)));
    assert!(matches!(n.tags[1].value, TagValue::Date(DateType::Floating(_))));
}

#[test]
fn test_tag_keys_are_case_insensitive() {
    let (n, _) = run("Ship DUE:2024-02-02");
    assert_eq!(n.summary, "Ship");
    assert_eq!(n.tags[0].kind, TagKind::Due);
}

#[test]
fn test_marker_takes_the_leading_word() {
    // Trailing punctuation stays in the summary; only `+word` is consumed.
    let (n, _) = run("Call Bob +errands. Then @phone, maybe");
    assert_eq!(n.categories, vec!["errands".to_string()]);
    assert_eq!(n.resources, vec!["phone".to_string()]);
    assert_eq!(n.summary, "Call Bob. Then, maybe");

    let (n, _) = run("Email bob +client-a @home");
    assert_eq!(n.categories, vec!["client".to_string()]);
    assert_eq!(n.resources, vec!["home".to_string()]);
    assert_eq!(n.summary, "Email bob-a");
}

#[test]
fn test_sigil_without_word_is_text() {
    let (n, _) = run("Add 2 + 2 @ noon +-");
    assert_eq!(n.summary, "Add 2 + 2 @ noon +-");
    assert!(n.categories.is_empty());
    assert!(n.resources.is_empty());
}

#[test]
fn test_markers_are_sorted_and_deduplicated() {
    let (n, _) = run("Tidy +b +a +b @z @y");
    assert_eq!(n.summary, "Tidy");
    assert_eq!(n.categories, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(n.resources, vec!["y".to_string(), "z".to_string()]);
}

#[test]
fn test_mail_addresses_are_text() {
    let (n, _) = run("Reply to bob@example.com");
    assert_eq!(n.summary, "Reply to bob@example.com");
    assert!(n.resources.is_empty());
}

#[test]
fn test_tag_dispatch_table() {
    for kind in TagKind::ALL {
        assert_eq!(TagKind::from_key(kind.name()), Some(kind));
        assert_eq!(TagKind::from_key(&kind.name().to_uppercase()), Some(kind));
    }
    assert_eq!(TagKind::from_key("priority"), None);

    assert_eq!(
        TagKind::Location.parse("Downtown"),
        Ok(TagValue::Text("Downtown".to_string()))
    );
    assert_eq!(
        TagKind::Categories.parse("a, b,,c"),
        Ok(TagValue::List(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string()
        ]))
    );
    assert!(TagKind::Start.parse("soon").is_err());
}
