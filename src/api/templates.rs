//! HTML pages rendered with Handlebars. Values are HTML escaped by
//! default so nothing from the config or the session can inject
//! markup.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Page {
    Home,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const HOME_PAGE: &str = include_str!("templates/home.html");

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&Page::Home.to_string(), HOME_PAGE)
        .expect("Failed to register template");
    registry
}
