//! HTML index of child contexts.

use std::fmt::Write as _;

use crate::error::WriteAfterCloseError;
use crate::handlers::Handler;
use crate::http::{InboundRequest, ResponseWriter};

/// Lists configured child context paths as links.
#[derive(Debug, Clone)]
pub struct ContextIndexHandler {
    children: Vec<String>,
}

impl ContextIndexHandler {
    pub fn new<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            children: children.into_iter().map(Into::into).collect(),
        }
    }

    fn render(&self) -> String {
        let mut page = String::from(
            "<html>\n<head><title>Contexts</title></head>\n<body>\n<h4>Child Contexts</h4>\n<ul>\n",
        );
        for child in &self.children {
            let child = escape_html(child);
            let _ = writeln!(page, "<li><a href=\"{child}\">{child}</a></li>");
        }
        page.push_str("</ul>\n</body></html>\n");
        page
    }
}

impl Handler for ContextIndexHandler {
    fn handle(
        &self,
        _request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        response.set_content_type("text/html; charset=utf-8")?;
        response.write_str(&self.render())?;
        Ok(true)
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
