//! The environment a page runs in

use url::Url;

/// Side effects a page performs outside its own markup
pub trait Host {
    /// Open `url` in a new browsing context
    fn open_in_new_context(&mut self, url: &str);

    /// Replace the current history entry with `url` without navigating
    fn replace_url(&mut self, url: &Url);

    /// Current location
    fn location(&self) -> &Url;
}

impl<H: Host + ?Sized> Host for &mut H {
    fn open_in_new_context(&mut self, url: &str) {
        (**self).open_in_new_context(url)
    }

    fn replace_url(&mut self, url: &Url) {
        (**self).replace_url(url)
    }

    fn location(&self) -> &Url {
        (**self).location()
    }
}

/// Host that records every side effect, for tests and offline rendering
#[derive(Debug, Clone)]
pub struct RecordingHost {
    history: Vec<Url>,
    opened: Vec<String>,
    replacements: usize,
}

impl RecordingHost {
    pub fn new(location: Url) -> Self {
        Self {
            history: vec![location],
            opened: Vec::new(),
            replacements: 0,
        }
    }

    /// Number of history entries; replacement never changes it
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// URLs opened in new contexts, oldest first
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Host for RecordingHost {
    fn open_in_new_context(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }

    fn replace_url(&mut self, url: &Url) {
        if let Some(current) = self.history.last_mut() {
            *current = url.clone();
        }
        self.replacements += 1;
    }

    fn location(&self) -> &Url {
        // history always holds the entry created in new()
        &self.history[self.history.len() - 1]
    }
}
