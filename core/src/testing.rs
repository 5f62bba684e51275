//! String-backed host used by the unit tests of this crate.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::cell::RefCell;
use std::collections::HashMap;

use crate::{CustomEvent, ElementError, Fetch, FetchError, Host, RenderRoot, ShadowMode};

#[derive(Debug, Default)]
pub struct StubHost {
    templates: HashMap<String, String>,
    urls: HashMap<String, String>,
    pub events: RefCell<Vec<CustomEvent>>,
}

impl StubHost {
    pub fn with_template(mut self, id: &str, markup: &str) -> Self {
        self.templates.insert(id.to_string(), markup.to_string());
        self
    }

    pub fn with_url(mut self, url: &str, markup: &str) -> Self {
        self.urls.insert(url.to_string(), markup.to_string());
        self
    }
}

impl Fetch for StubHost {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.urls.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

#[derive(Debug, Default)]
pub struct StubRoot {
    pub shadow: bool,
    pub html: String,
}

impl RenderRoot for StubRoot {
    type Fragment = String;

    fn clear(&mut self) -> Result<(), ElementError> {
        self.html.clear();
        Ok(())
    }

    fn append(&mut self, fragment: String) -> Result<(), ElementError> {
        self.html.push_str(&fragment);
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    fn inner_html(&self) -> String {
        self.html.clone()
    }

    fn set_inner_html(&mut self, markup: &str) -> Result<(), ElementError> {
        self.html = markup.to_string();
        Ok(())
    }

    fn text_content(&self) -> String {
        self.html.clone()
    }

    fn set_text(&mut self, _selector: &str, text: &str) -> Result<usize, ElementError> {
        self.html = text.to_string();
        Ok(1)
    }

    fn set_attribute(
        &mut self,
        _selector: &str,
        _name: &str,
        _value: &str,
    ) -> Result<usize, ElementError> {
        Ok(0)
    }
}

impl Host for StubHost {
    type Fragment = String;
    type Root = StubRoot;

    fn attach_root(&self, use_shadow: bool, _mode: ShadowMode) -> Result<StubRoot, ElementError> {
        Ok(StubRoot {
            shadow: use_shadow,
            html: String::new(),
        })
    }

    fn template_by_id(&self, id: &str) -> Option<String> {
        self.templates.get(id).cloned()
    }

    fn parse_template(&self, markup: &str) -> Result<String, ElementError> {
        Ok(markup.to_string())
    }

    fn dispatch_event(&self, event: &CustomEvent) -> Result<bool, ElementError> {
        self.events.borrow_mut().push(event.clone());
        Ok(true)
    }
}
