// Rendering derives display content without touching the document

mod common;

use common::Session;
use writeonly::event_bus::RenderText;
use writeonly::plugins::syntax_highlighting;
use writeonly::render::render_text;
use writeonly::ui::markup::styled_lines;

#[test]
fn heading_renders_plain_then_highlighted() {
    let mut session = Session::new();
    session.type_text("# Heading");

    let plain = render_text(&session.editor.bus, session.editor.doc.text());
    assert!(!plain.is_html);
    assert_eq!(plain.content, "# Heading");
    assert_eq!(session.editor.rendered, plain);

    session
        .editor
        .set_plugin_enabled(syntax_highlighting::KEY, true);
    assert!(session.editor.rendered.is_html);
    assert!(
        session
            .editor
            .rendered
            .content
            .contains(r#"<span class="hljs-section"># Heading</span>"#)
    );
    assert_eq!(session.editor.doc.text(), "# Heading");
}

#[test]
fn highlighted_text_reaches_the_pane_styled() {
    let mut session = Session::with_plugins(serde_json::json!({
        "syntaxHighlighting": { "enabled": true }
    }));
    session.type_text("# Title\n\nsome *stress* & <angles>");

    let lines = styled_lines(&session.editor.rendered);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0][0].class.as_deref(), Some("hljs-section"));
    let last: String = lines[2].iter().map(|run| run.text.as_str()).collect();
    assert_eq!(last, "some *stress* & <angles>");
    assert!(
        lines[2]
            .iter()
            .any(|run| run.class.as_deref() == Some("hljs-emphasis"))
    );
}

#[test]
fn disabling_highlighting_unsubscribes() {
    let mut session = Session::with_plugins(serde_json::json!({
        "syntaxHighlighting": { "enabled": true }
    }));
    assert_eq!(session.editor.bus.subscribers::<RenderText>(), 1);
    session
        .editor
        .set_plugin_enabled(syntax_highlighting::KEY, false);
    assert_eq!(session.editor.bus.subscribers::<RenderText>(), 0);
    session.type_text("*x*");
    assert!(!session.editor.rendered.is_html);
}
