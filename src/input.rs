/// Single-line task entry.
///
/// Disabled while a run is in flight; edits and submissions are ignored
/// until the run ends and the input is released.
#[derive(Clone, Debug)]
pub struct TaskInput {
    buffer: String,
    enabled: bool,
}

impl Default for TaskInput {
    fn default() -> Self {
        Self {
            buffer: String::new(),
            enabled: true,
        }
    }
}

impl TaskInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_text(&mut self, text: &str) {
        if self.enabled {
            self.buffer = text.to_string();
        }
    }

    pub fn insert(&mut self, ch: char) {
        if self.enabled {
            self.buffer.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.enabled {
            self.buffer.pop();
        }
    }

    /// Take the trimmed task and disable the input. Blank text and a
    /// disabled input yield `None` and change nothing.
    pub fn submit(&mut self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let task = self.buffer.trim();
        if task.is_empty() {
            return None;
        }
        let task = task.to_string();
        self.enabled = false;
        Some(task)
    }

    /// Re-enable after a run. Returns `false` if it was already enabled.
    pub fn release(&mut self) -> bool {
        if self.enabled {
            return false;
        }
        self.enabled = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_submissions_are_ignored() {
        let mut input = TaskInput::new();
        assert_eq!(input.submit(), None);
        input.set_text("   \t ");
        assert_eq!(input.submit(), None);
        assert!(input.is_enabled());
    }

    #[test]
    fn submit_trims_and_disables() {
        let mut input = TaskInput::new();
        input.set_text("  find the weather ");
        assert_eq!(input.submit().as_deref(), Some("find the weather"));
        assert!(!input.is_enabled());

        input.insert('x');
        input.backspace();
        assert_eq!(input.text(), "  find the weather ");
        assert_eq!(input.submit(), None);
    }

    #[test]
    fn release_happens_once() {
        let mut input = TaskInput::new();
        input.set_text("task");
        input.submit();
        assert!(input.release());
        assert!(!input.release());
        assert!(input.is_enabled());
    }

    #[test]
    fn typing_edits_buffer() {
        let mut input = TaskInput::new();
        for ch in "abc".chars() {
            input.insert(ch);
        }
        input.backspace();
        assert_eq!(input.text(), "ab");
    }
}
