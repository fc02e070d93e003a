//! Integration tests for the table insertion modes and foster parenting.
//!
//! [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)

use arbor_html::{dump_tree, parse_document};

const PREFIX: &str = "| <!DOCTYPE html>\n| <html>\n|   <head>\n|   <body>\n";

/// Parse a document with a DOCTYPE and return the dump of the body's subtree.
fn body_dump(markup: &str) -> String {
    let (tree, _) = parse_document(&format!("<!DOCTYPE html>{markup}"));
    let dump = dump_tree(&tree);
    dump.strip_prefix(PREFIX)
        .map(str::to_string)
        .unwrap_or_else(|| panic!("unexpected document shape:\n{dump}"))
}

fn errors(markup: &str) -> Vec<String> {
    parse_document(&format!("<!DOCTYPE html>{markup}"))
        .1
        .into_iter()
        .filter(|issue| issue.is_error)
        .map(|issue| issue.message)
        .collect()
}

#[test]
fn test_cell_text_is_not_foster_parented() {
    assert_eq!(
        body_dump("<table><tr><td>1"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"1\"\n"
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    assert_eq!(
        body_dump("<table>X</table>"),
        "|     \"X\"\n|     <table>\n"
    );
}

#[test]
fn test_foster_parented_runs_merge() {
    assert_eq!(
        body_dump("<table>a<tr>b</tr>c</table>"),
        "|     \"abc\"\n|     <table>\n|       <tbody>\n|         <tr>\n"
    );
}

#[test]
fn test_whitespace_in_table_stays_in_table() {
    assert_eq!(
        body_dump("<table> <tr>"),
        "|     <table>\n|       \" \"\n|       <tbody>\n|         <tr>\n"
    );
}

#[test]
fn test_elements_in_table_are_foster_parented() {
    assert_eq!(
        body_dump("<table><div>x</div></table>"),
        "|     <div>\n|       \"x\"\n|     <table>\n"
    );
}

#[test]
fn test_hidden_input_stays_in_table() {
    assert_eq!(
        body_dump("<table><input type=hidden><input type=text></table>"),
        "|     <input>\n|       type=\"text\"\n|     <table>\n|       <input>\n|         type=\"hidden\"\n"
    );
}

#[test]
fn test_caption_and_column_group() {
    assert_eq!(
        body_dump("<table><caption>c</caption><colgroup><col></colgroup></table>"),
        "|     <table>\n|       <caption>\n|         \"c\"\n|       <colgroup>\n|         <col>\n"
    );
}

#[test]
fn test_col_implies_colgroup() {
    assert_eq!(
        body_dump("<table><col></table>"),
        "|     <table>\n|       <colgroup>\n|         <col>\n"
    );
}

#[test]
fn test_new_cell_closes_open_cell() {
    assert_eq!(
        body_dump("<table><tr><td>a<td>b</table>"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"a\"\n|           <td>\n|             \"b\"\n"
    );
}

#[test]
fn test_new_row_closes_open_row() {
    assert_eq!(
        body_dump("<table><tr><th>a<tr><td>b"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <th>\n|             \"a\"\n|         <tr>\n|           <td>\n|             \"b\"\n"
    );
}

#[test]
fn test_table_sections() {
    assert_eq!(
        body_dump("<table><thead><tr><th>h<tbody><tr><td>b<tfoot><tr><td>f</table>"),
        "|     <table>\n|       <thead>\n|         <tr>\n|           <th>\n|             \"h\"\n|       <tbody>\n|         <tr>\n|           <td>\n|             \"b\"\n|       <tfoot>\n|         <tr>\n|           <td>\n|             \"f\"\n"
    );
}

#[test]
fn test_nested_table_closes_outer_table() {
    assert_eq!(
        body_dump("<table><table>"),
        "|     <table>\n|     <table>\n"
    );
    assert!(errors("<table><table>").contains(&"unexpected-start-tag-table-in-table".to_string()));
}

#[test]
fn test_table_inside_cell() {
    assert_eq!(
        body_dump("<table><td><table><td>x</table></table>"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             <table>\n|               <tbody>\n|                 <tr>\n|                   <td>\n|                     \"x\"\n"
    );
}

#[test]
fn test_stray_table_end_tags_are_ignored() {
    assert_eq!(body_dump("</table></td></tr>x"), "|     \"x\"\n");
}

#[test]
fn test_select_in_cell_is_closed_by_new_cell() {
    assert_eq!(
        body_dump("<table><tr><td><select><option>a<td>b</table>"),
        "|     <table>\n|       <tbody>\n|         <tr>\n|           <td>\n|             <select>\n|               <option>\n|                 \"a\"\n|           <td>\n|             \"b\"\n"
    );
}

#[test]
fn test_select_options() {
    assert_eq!(
        body_dump("<select><option>a<option>b<optgroup><option>c</select>d"),
        "|     <select>\n|       <option>\n|         \"a\"\n|       <option>\n|         \"b\"\n|       <optgroup>\n|         <option>\n|           \"c\"\n|     \"d\"\n"
    );
}

#[test]
fn test_nested_select_closes_select() {
    assert_eq!(
        body_dump("<select><option>a<select>b"),
        "|     <select>\n|       <option>\n|         \"a\"\n|     \"b\"\n"
    );
}

#[test]
fn test_form_in_table_is_inserted_and_popped() {
    assert_eq!(
        body_dump("<table><form><tr><td><input></table>"),
        "|     <table>\n|       <form>\n|       <tbody>\n|         <tr>\n|           <td>\n|             <input>\n"
    );
}

#[test]
fn test_template_in_table() {
    assert_eq!(
        body_dump("<table><template><tr><td>x</template></table>"),
        "|     <table>\n|       <template>\n|         content\n|           <tr>\n|             <td>\n|               \"x\"\n"
    );
}
