//! Generated stylesheet for scrollable pages

use std::fmt::Write;

use super::{Axis, ScrollOptions};

pub const DEFAULT_BACKGROUND: &str = "#333333";

/// Background of a page section
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(String),
    /// Image URL, drawn covering the page
    Image(String),
    Gradient(Gradient),
}

/// A CSS gradient
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// `linear-gradient`, `radial-gradient`, ...
    pub kind: String,
    /// Leading argument such as `45deg` or `circle`
    pub angle: Option<String>,
    pub stops: Vec<String>,
}

impl Gradient {
    pub fn linear<S: Into<String>>(stops: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: "linear-gradient".to_string(),
            angle: None,
            stops: stops.into_iter().map(Into::into).collect(),
        }
    }

    pub fn radial<S: Into<String>>(stops: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: "radial-gradient".to_string(),
            ..Self::linear(stops)
        }
    }

    pub fn angle(mut self, angle: impl Into<String>) -> Self {
        self.angle = Some(angle.into());
        self
    }

    pub fn to_css(&self) -> String {
        let args: Vec<&str> = self
            .angle
            .as_deref()
            .into_iter()
            .chain(self.stops.iter().map(String::as_str))
            .collect();
        format!("{}({})", self.kind, args.join(", "))
    }
}

impl Background {
    pub fn color(color: impl Into<String>) -> Self {
        Background::Color(color.into())
    }

    pub fn image(url: impl Into<String>) -> Self {
        Background::Image(url.into())
    }

    /// Rule applying this background to `selector`
    pub fn css(&self, selector: &str) -> String {
        match self {
            Background::Color(color) => {
                format!("{} {{ background-color: {}; }}\n", selector, color)
            }
            Background::Image(url) => format!(
                "{} {{ background-image: url(\"{}\"); background-size: cover; \
                 background-position: center; }}\n",
                selector, url
            ),
            Background::Gradient(gradient) => {
                format!("{} {{ background-image: {}; }}\n", selector, gradient.to_css())
            }
        }
    }
}

/// Which optional parts the stylesheet covers
pub(crate) struct Layout<'a> {
    pub page_hashes: &'a [String],
    pub backgrounds: &'a [Background],
    pub navbar: bool,
    pub footer: bool,
}

pub(crate) fn stylesheet(options: &ScrollOptions, layout: &Layout<'_>) -> String {
    let prefix = &options.class_prefix;
    let pages = layout.page_hashes.len().max(1);
    let (direction, overflow, opposite, width, height, snap) = match options.axis {
        Axis::X => (
            "row",
            "overflow-x",
            "overflow-y",
            format!("calc(100vw * {})", pages),
            "100%".to_string(),
            "x",
        ),
        Axis::Y => (
            "column",
            "overflow-y",
            "overflow-x",
            "100%".to_string(),
            format!("calc(100vh * {})", pages),
            "y",
        ),
    };

    let mut css = format!(
        "* {{ margin: 0; padding: 0; }}
body {{ height: 100vh; width: 100vw; overflow: hidden; }}
.{prefix}-scrollable-page-container {{
    width: 100vw;
    height: 100vh;
    {overflow}: hidden;
    {opposite}: hidden;
    scroll-behavior: smooth;
    scroll-snap-type: {snap} mandatory;
    scroll-snap-stop: always;
}}
.{prefix}-scrollable-page {{
    width: {width};
    height: {height};
    display: flex;
    flex-direction: {direction};
}}
.{prefix}-page {{
    scroll-snap-align: center;
    display: flex;
    flex-direction: column;
    align-items: center;
    justify-content: center;
    width: 100vw;
    height: 100vh;
    font-size: 1.5em;
}}
"
    );

    if layout.navbar {
        let _ = writeln!(
            css,
            ".{prefix}-navbar {{ position: fixed; top: 0; left: 0; right: 0; z-index: 1000; }}"
        );
    }
    if layout.footer {
        let _ = writeln!(
            css,
            ".{prefix}-footer {{ position: fixed; bottom: 0; left: 0; right: 0; z-index: 1000; }}"
        );
    }

    if layout.backgrounds.is_empty() {
        css.push_str(&Background::color(DEFAULT_BACKGROUND).css(&format!(".{}-page", prefix)));
    } else {
        for (hash, background) in layout
            .page_hashes
            .iter()
            .zip(layout.backgrounds.iter().cycle())
        {
            css.push_str(&background.css(&format!("#{}", hash)));
        }
    }
    css
}
