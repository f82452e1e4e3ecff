//! HTML rendering of the view state.
//!
//! Produces the viewer body the host page mounts under its file input: the
//! sheet picker, the data table, or the empty-state notice.

use crate::view::ViewState;

pub const EMPTY_MESSAGE: &str =
    "No data found for the selected sheet, or the sheet is empty/invalid.";

/// Element id of the sheet `<select>`, for hosts wiring change events.
pub const SHEET_SELECT_ID: &str = "xlgrid-sheet";

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the whole viewer body.
pub fn render(state: &ViewState) -> String {
    let mut html = String::from("<div class=\"xlgrid-viewer\">");

    // a single sheet needs no picker
    if state.sheet_names.len() > 1 {
        render_sheet_picker(state, &mut html);
    }

    if !state.rows.is_empty() {
        render_table(state, &mut html);
    }

    if state.is_empty_selection() {
        html.push_str("<p class=\"xlgrid-empty\">");
        html.push_str(EMPTY_MESSAGE);
        html.push_str("</p>");
    }

    html.push_str("</div>");
    html
}

fn render_sheet_picker(state: &ViewState, html: &mut String) {
    html.push_str("<div class=\"xlgrid-sheets\">");
    html.push_str(&format!(
        "<label for=\"{SHEET_SELECT_ID}\">Select Sheet:&nbsp;</label><select id=\"{SHEET_SELECT_ID}\">"
    ));
    for name in &state.sheet_names {
        let selected = if state.selected_sheet.as_ref() == Some(name) {
            " selected"
        } else {
            ""
        };
        let name = escape_html(name);
        html.push_str(&format!("<option value=\"{name}\"{selected}>{name}</option>"));
    }
    html.push_str("</select></div>");
}

fn render_table(state: &ViewState, html: &mut String) {
    html.push_str("<table class=\"xlgrid-table\"><thead><tr><th></th>");
    for header in &state.headers {
        push_cell(html, "th", header);
    }
    html.push_str("</tr></thead><tbody>");
    for row in &state.rows {
        html.push_str("<tr>");
        for cell in row {
            push_cell(html, "td", cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn push_cell(html: &mut String, tag: &str, text: &str) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&escape_html(text));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}
