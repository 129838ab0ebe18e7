//! Minimal static SVG output for eyeballing a settled chart.
//!
//! This is debug chrome, not a styled render: one circle and one label per
//! bubble, nothing else.

use bubbly::ChartLayout;

pub fn render_chart(layout: &ChartLayout) -> String {
    let width = layout.viewport.width;
    let height = layout.viewport.height;

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    ));
    out.push_str("<g class=\"bubbles\">\n");
    for b in &layout.bubbles {
        out.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"#e8e8e8\" stroke=\"#555\"><title>{} (risk {:.1})</title></circle>\n",
            b.x,
            b.y,
            b.radius,
            escape_xml(&b.id),
            b.risk
        ));
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"{:.0}\">{}</text>\n",
            b.x,
            b.y,
            (b.radius * 0.7).clamp(8.0, 16.0),
            escape_xml(&b.label)
        ));
    }
    out.push_str("</g>\n</svg>\n");
    out
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_xml;

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(escape_xml("A&B <\"x\">'"), "A&amp;B &lt;&quot;x&quot;&gt;&apos;");
    }
}
