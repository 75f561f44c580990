//! Markdown → tree → Markdown stability over generated documents.

use crate::common::{normalize, parse, serialize};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn phrase() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..5).prop_map(|words| words.join(" "))
}

/// Every span pairs its own marker characters, so adjacent spans never borrow each other's.
fn inline_span() -> impl Strategy<Value = String> {
    prop_oneof![
        phrase(),
        phrase().prop_map(|p| format!("**{p}**")),
        phrase().prop_map(|p| format!("*{p}*")),
        phrase().prop_map(|p| format!("_{p}_")),
        phrase().prop_map(|p| format!("~~{p}~~")),
        word().prop_map(|w| format!("`{w}`")),
        word().prop_map(|w| format!("`**{w}** _{w}_ ${w}$`")),
        (word(), word()).prop_map(|(a, b)| format!("``{a}`{b}``")),
        (phrase(), word()).prop_map(|(p, w)| format!("[{p}](https://{w}.org)")),
        (phrase(), word(), word())
            .prop_map(|(p, a, b)| format!("[{p}](https://{a}.org/{a}_{b}_{a}?q=${b}$)")),
        (phrase(), word(), word()).prop_map(|(p, a, b)| format!("![{p}]({a}_{b}_{a}.png)")),
        word().prop_map(|w| format!("${w}^2$")),
    ]
}

fn block() -> impl Strategy<Value = String> {
    prop_oneof![
        (1..=6usize, phrase()).prop_map(|(level, p)| format!("{} {p}", "#".repeat(level))),
        prop::collection::vec(inline_span(), 1..4).prop_map(|spans| spans.join(" ")),
        prop::collection::vec(phrase(), 1..4).prop_map(|items| {
            items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
        }),
        prop::collection::vec(phrase(), 1..4).prop_map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(n, i)| format!("{}. {i}", n + 1))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        (word(), prop::collection::vec(phrase(), 1..3))
            .prop_map(|(lang, body)| format!("```{lang}\n{}\n```", body.join("\n"))),
        phrase().prop_map(|p| format!("$${p}$$")),
        phrase().prop_map(|p| format!("```plantuml\n{p}\n```")),
        (word(), word(), word(), word())
            .prop_map(|(a, b, c, d)| format!("| {a} | {b} |\n| --- | --- |\n| {c} | {d} |")),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(block(), 0..6).prop_map(|blocks| blocks.join("\n\n"))
}

proptest! {
    #[test]
    fn tree_survives_a_markdown_round_trip(md in document()) {
        let doc = parse(&md);
        prop_assert_eq!(parse(&serialize(&doc)), doc);
    }

    #[test]
    fn normalized_markdown_is_a_fixed_point(md in document()) {
        let once = normalize(&md);
        prop_assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_trees_with_marker_characters_are_stable() {
    for md in [
        "``a`b``",
        "![**a]b**](x)",
        "_a*b_",
        "[docs](https://x.io/my_page_name) ![i](a_b_c.png)",
        "`__init__`",
        "`echo $A $B`",
        "`**x**`",
    ] {
        let doc = parse(md);
        assert_eq!(parse(&serialize(&doc)), doc, "unstable: {md}");
    }
}

#[test]
fn test_crlf_input_matches_lf() {
    let lf = "# Title\n\n- a\n- b\n\n```sh\nls\n```";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(&crlf), parse(lf));
}
