use pretty_assertions::assert_eq;

use retask_core::task_input::{parse_task_input, TaskInput};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn bracketed_list_is_returned_verbatim() {
    let parsed = parse_task_input(r#"["Pick up the cube", " Place ", "Pick up the cube"]"#);
    assert_eq!(
        parsed,
        strings(&["Pick up the cube", " Place ", "Pick up the cube"])
    );
}

#[test]
fn single_quoted_list_is_accepted() {
    let parsed = parse_task_input("  ['Pick', 'Place']  ");
    assert_eq!(parsed, strings(&["Pick", "Place"]));
}

#[test]
fn comma_separated_input_is_split_trimmed_and_filtered() {
    assert_eq!(parse_task_input("a, b ,,c"), strings(&["a", "b", "c"]));
    assert_eq!(
        parse_task_input("Pick up cube,Place cube,Push button"),
        strings(&["Pick up cube", "Place cube", "Push button"])
    );
}

#[test]
fn plain_text_becomes_single_trimmed_task() {
    assert_eq!(
        parse_task_input("  Pick up the red cube \n"),
        strings(&["Pick up the red cube"])
    );
}

#[test]
fn malformed_bracket_falls_back_to_comma_split() {
    assert_eq!(parse_task_input("[1, 2]"), strings(&["[1", "2]"]));
    assert_eq!(parse_task_input("['a', b]"), strings(&["['a'", "b]"]));
}

#[test]
fn malformed_bracket_without_comma_is_single_task() {
    assert_eq!(parse_task_input("[pick]"), strings(&["[pick]"]));
}

#[test]
fn only_commas_yield_empty_sequence() {
    assert!(parse_task_input(" , ,, ").is_empty());
}

#[test]
fn empty_list_literal_yields_empty_sequence() {
    assert!(parse_task_input("[]").is_empty());
}

#[test]
fn parsed_list_input_is_used_as_is() {
    let input = TaskInput::from(strings(&["a, b", ""]));
    assert_eq!(input.resolve(), strings(&["a, b", ""]));

    let input = TaskInput::from("a, b");
    assert_eq!(input.resolve(), strings(&["a", "b"]));
}
