use super::*;

#[test]
fn parses_navigation_commands() {
    assert_eq!(parse_command("next"), Some(Command::Next));
    assert_eq!(parse_command(" p 3 "), Some(Command::Page(3)));
    assert_eq!(parse_command("prev"), Some(Command::Previous));
    assert_eq!(parse_command("q"), Some(Command::Quit));
}

#[test]
fn search_keeps_inner_whitespace_and_allows_clearing() {
    assert_eq!(
        parse_command("search running shoe"),
        Some(Command::Search("running shoe".to_string()))
    );
    assert_eq!(parse_command("search"), Some(Command::Search(String::new())));
}

#[test]
fn sort_values_follow_the_query_vocabulary() {
    assert_eq!(
        parse_command("sort price-desc"),
        Some(Command::Sort(SortOption::PriceDesc))
    );
    assert_eq!(parse_command("sort bogus"), Some(Command::Sort(SortOption::Recent)));
}

#[test]
fn rejects_unknown_or_malformed_commands() {
    assert_eq!(parse_command("jump"), None);
    assert_eq!(parse_command("page two"), None);
}
