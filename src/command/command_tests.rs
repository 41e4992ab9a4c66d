//! Tests for the command line parser.

use super::*;

fn parse(line: &str) -> Command {
    match parse_line(line) {
        Ok(Some(command)) => command,
        other => panic!("expected a command for {line:?}, got {other:?}"),
    }
}

fn group(name: &str) -> GroupName {
    GroupName::new(name).expect("valid group")
}

// ===== Blank lines and comments =====

#[test]
fn blank_and_comment_lines_carry_no_command() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("   \t"), Ok(None));
    assert_eq!(parse_line("# walk to the brand"), Ok(None));
    assert_eq!(parse_line("   # indented comment"), Ok(None));
}

// ===== Navigation =====

#[test]
fn navigation_commands_parse() {
    assert_eq!(parse("open longe"), Command::Open("longe".to_string()));
    assert_eq!(parse("go  longe-zeiss "), Command::Go("longe-zeiss".to_string()));
    assert_eq!(parse("back"), Command::Back);
    assert_eq!(parse("level 2"), Command::Level(2));
    assert_eq!(parse("home"), Command::Home);
    assert_eq!(parse("root"), Command::Root);
    assert_eq!(parse("jump longe-zeiss-light"), Command::Jump("longe-zeiss-light".to_string()));
    assert_eq!(parse("category perto"), Command::Category("perto".to_string()));
    assert_eq!(parse("setup material"), Command::Setup("material".to_string()));
}

#[test]
fn level_rejects_zero_and_garbage() {
    assert_eq!(parse_line("level 0"), Err(CommandError::InvalidLevel("0".to_string())));
    assert_eq!(parse_line("level two"), Err(CommandError::InvalidLevel("two".to_string())));
    assert!(matches!(
        parse_line("level"),
        Err(CommandError::MissingArgument { command: "level", .. })
    ));
}

#[test]
fn single_word_commands_reject_extra_words() {
    assert_eq!(
        parse_line("go longe extra"),
        Err(CommandError::UnexpectedArgument {
            command: "go",
            extra: "extra".to_string()
        })
    );
    assert!(matches!(
        parse_line("back now"),
        Err(CommandError::UnexpectedArgument { command: "back", .. })
    ));
}

// ===== Filters and products =====

#[test]
fn filter_add_takes_optional_label_with_spaces() {
    assert_eq!(
        parse("filter add anti-reflective ar-crizal Crizal Sapphire"),
        Command::FilterAdd {
            kind: FilterKind::AntiReflective,
            item: SelectionItem::new("ar-crizal")
                .expect("valid")
                .with_label("Crizal Sapphire"),
        }
    );
    assert_eq!(
        parse("filter add material material-trivex"),
        Command::FilterAdd {
            kind: FilterKind::Material,
            item: SelectionItem::new("material-trivex").expect("valid"),
        }
    );
}

#[test]
fn filter_rm_parses_kind_and_id() {
    assert_eq!(
        parse("filter rm brand longe-zeiss"),
        Command::FilterRemove {
            kind: FilterKind::Brand,
            id: ItemId::new("longe-zeiss").expect("valid"),
        }
    );
}

#[test]
fn filter_errors_are_specific() {
    assert!(matches!(
        parse_line("filter"),
        Err(CommandError::MissingArgument { command: "filter", .. })
    ));
    assert_eq!(
        parse_line("filter swap brand x"),
        Err(CommandError::Unknown("filter swap".to_string()))
    );
    assert_eq!(
        parse_line("filter add glitter g1"),
        Err(CommandError::FilterKind(UnknownFilterKind("glitter".to_string())))
    );
    assert!(matches!(
        parse_line("filter rm tint"),
        Err(CommandError::MissingArgument { command: "filter rm", .. })
    ));
}

#[test]
fn product_commands_parse() {
    assert_eq!(parse("config material-trivex"), Command::Config("material-trivex".to_string()));
    assert_eq!(parse("product longe-zeiss-light"), Command::Product("longe-zeiss-light".to_string()));
    assert_eq!(parse("unproduct Zeiss Light 2"), Command::Unproduct("Zeiss Light 2".to_string()));
    assert_eq!(parse("clear"), Command::Clear);
}

// ===== Ledger =====

#[test]
fn ledger_commands_parse() {
    assert_eq!(
        parse("select tratamento polimento Polimento Fino"),
        Command::Select {
            group: group("tratamento"),
            item: SelectionItem::new("polimento")
                .expect("valid")
                .with_label("Polimento Fino"),
        }
    );
    assert_eq!(
        parse("deselect material m1"),
        Command::Deselect {
            group: group("material"),
            id: ItemId::new("m1").expect("valid"),
        }
    );
    assert!(matches!(parse("toggle indice i167"), Command::Toggle { .. }));
    assert_eq!(parse("clear-group material"), Command::ClearGroup(group("material")));
    assert_eq!(parse("clear-selections"), Command::ClearSelections);
    assert_eq!(parse("validate"), Command::Validate);
}

#[test]
fn ledger_commands_require_group_and_item() {
    assert!(matches!(
        parse_line("select"),
        Err(CommandError::MissingArgument { command: "select", .. })
    ));
    assert!(matches!(
        parse_line("select material"),
        Err(CommandError::MissingArgument { command: "select", .. })
    ));
}

// ===== Session =====

#[test]
fn session_commands_parse_and_name_themselves() {
    assert_eq!(parse("show").keyword(), "show");
    assert_eq!(parse("save").keyword(), "save");
    assert_eq!(parse("filter rm tint cor-cinza").keyword(), "filter rm");
}

#[test]
fn unknown_command_is_reported() {
    assert_eq!(parse_line("fly away"), Err(CommandError::Unknown("fly".to_string())));
}
