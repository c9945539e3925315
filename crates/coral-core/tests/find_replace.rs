use coral_core::{
    CommandError, CommandResult, CursorCommand, EditCommand, Editor, Position, SearchError,
    SearchOptions,
};
use pretty_assertions::assert_eq;

fn find_next(editor: &mut Editor, query: &str, options: SearchOptions) -> CommandResult {
    editor
        .execute(CursorCommand::FindNext {
            query: query.to_string(),
            options,
        })
        .unwrap()
}

#[test]
fn test_find_next_cycles_through_matches() {
    let mut editor = Editor::from_text("foo bar\nfoo baz foo");
    let opts = SearchOptions::default();

    let hits: Vec<_> = (0..4).map(|_| find_next(&mut editor, "foo", opts)).collect();
    assert_eq!(
        hits,
        vec![
            CommandResult::SearchMatch {
                start: Position::new(0, 0),
                end: Position::new(0, 3)
            },
            CommandResult::SearchMatch {
                start: Position::new(1, 0),
                end: Position::new(1, 3)
            },
            CommandResult::SearchMatch {
                start: Position::new(1, 8),
                end: Position::new(1, 11)
            },
            CommandResult::SearchMatch {
                start: Position::new(0, 0),
                end: Position::new(0, 3)
            },
        ]
    );
    assert_eq!(editor.selected_text().as_deref(), Some("foo"));
    assert_eq!(editor.cursor(), Position::new(0, 3));
}

#[test]
fn test_find_prev_wraps_to_last_match() {
    let mut editor = Editor::from_text("a1 a2 a3");
    let result = editor
        .execute(CursorCommand::FindPrev {
            query: "a".to_string(),
            options: SearchOptions::default(),
        })
        .unwrap();
    assert_eq!(
        result,
        CommandResult::SearchMatch {
            start: Position::new(0, 6),
            end: Position::new(0, 7)
        }
    );
}

#[test]
fn test_empty_and_missing_queries() {
    let mut editor = Editor::from_text("text");
    assert_eq!(
        find_next(&mut editor, "", SearchOptions::default()),
        CommandResult::SearchNotFound
    );
    assert_eq!(
        find_next(&mut editor, "absent", SearchOptions::default()),
        CommandResult::SearchNotFound
    );

    let replace = editor.execute(EditCommand::ReplaceAll {
        query: String::new(),
        replacement: "x".to_string(),
        options: SearchOptions::default(),
    });
    assert!(matches!(
        replace,
        Err(CommandError::Search(SearchError::EmptyQuery))
    ));
}

#[test]
fn test_whole_word_and_case_options() {
    let mut editor = Editor::from_text("cat concat Cat");
    let whole_word = SearchOptions {
        whole_word: true,
        case_sensitive: false,
        ..SearchOptions::default()
    };
    assert_eq!(
        find_next(&mut editor, "cat", whole_word),
        CommandResult::SearchMatch {
            start: Position::new(0, 0),
            end: Position::new(0, 3)
        }
    );
    assert_eq!(
        find_next(&mut editor, "cat", whole_word),
        CommandResult::SearchMatch {
            start: Position::new(0, 11),
            end: Position::new(0, 14)
        }
    );
}

#[test]
fn test_replace_current_then_next() {
    let mut editor = Editor::from_text("one two one");
    let replace = || EditCommand::ReplaceCurrent {
        query: "one".to_string(),
        replacement: "1".to_string(),
        options: SearchOptions::default(),
    };

    assert_eq!(
        editor.execute(replace()).unwrap(),
        CommandResult::Replaced { count: 1 }
    );
    assert_eq!(editor.text(), "1 two one");
    assert_eq!(editor.selected_text().as_deref(), Some("1"));

    editor.execute(replace()).unwrap();
    assert_eq!(editor.text(), "1 two 1");
    assert_eq!(
        editor.execute(replace()).unwrap(),
        CommandResult::SearchNotFound
    );

    editor.execute(EditCommand::Undo).unwrap();
    assert_eq!(editor.text(), "1 two one");
}

#[test]
fn test_replace_all_with_captures_is_one_undo_step() {
    let mut editor = Editor::from_text("let a = 1;\nlet b = 22;");
    let result = editor
        .execute(EditCommand::ReplaceAll {
            query: r"(\w) = (\d+)".to_string(),
            replacement: "$2 = $1".to_string(),
            options: SearchOptions {
                regex: true,
                ..SearchOptions::default()
            },
        })
        .unwrap();

    assert_eq!(result, CommandResult::Replaced { count: 2 });
    assert_eq!(editor.lines(), vec!["let 1 = a;", "let 22 = b;"]);
    assert_eq!(editor.history().undo_count(), 1);

    editor.execute(EditCommand::Undo).unwrap();
    assert_eq!(editor.text(), "let a = 1;\nlet b = 22;");
}

#[test]
fn test_replace_all_across_lines() {
    let mut editor = Editor::from_text("a;\nb;\nc");
    let result = editor
        .execute(EditCommand::ReplaceAll {
            query: ";\n".to_string(),
            replacement: ", ".to_string(),
            options: SearchOptions::default(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Replaced { count: 2 });
    assert_eq!(editor.lines(), vec!["a, b, c"]);
}

#[test]
fn test_replace_all_without_matches_records_nothing() {
    let mut editor = Editor::from_text("abc");
    let result = editor
        .execute(EditCommand::ReplaceAll {
            query: "zzz".to_string(),
            replacement: "y".to_string(),
            options: SearchOptions::default(),
        })
        .unwrap();
    assert_eq!(result, CommandResult::Replaced { count: 0 });
    assert!(!editor.can_undo());
}
