use tui_textarea::{CursorMove, TextArea};

/// Text shown around the prompt field. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptLabels {
    pub heading: &'static str,
    pub placeholder: &'static str,
    pub button: &'static str,
}

const GENERATE_LABELS: PromptLabels = PromptLabels {
    heading: "描述您想生成的圖片",
    placeholder: "範例：一隻有翅膀、戴著高帽的豬飛過未來城市的 3D 渲染圖...",
    button: "生成圖片",
};

const EDIT_LABELS: PromptLabels = PromptLabels {
    heading: "描述您想如何編輯圖片",
    placeholder: "範例：將背景設為藍色並添加一道彩虹...",
    button: "編輯圖片",
};

impl PromptLabels {
    pub fn for_mode(is_editing: bool) -> Self {
        if is_editing {
            EDIT_LABELS
        } else {
            GENERATE_LABELS
        }
    }
}

/// Single-line prompt field.
#[derive(Debug, Clone, Default)]
pub struct PromptInput {
    textarea: TextArea<'static>,
}

impl PromptInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::from(lines);
        self.textarea.move_cursor(CursorMove::Bottom);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn insert_str(&mut self, text: &str) {
        // The field is a single line; pasted newlines become spaces.
        let flattened = text.replace(['\r', '\n'], " ");
        self.textarea.insert_str(flattened);
    }

    pub fn clear(&mut self) {
        self.textarea = TextArea::default();
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    /// Applies an edit to the underlying textarea, e.g. a key input.
    pub fn apply_edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextArea<'static>),
    {
        f(&mut self.textarea);
    }

    pub fn can_submit(&self, is_loading: bool) -> bool {
        !is_loading && !self.text().trim().is_empty()
    }

    /// Takes the trimmed prompt and clears the field. Returns `None` when the
    /// prompt is blank or a generation is already running.
    pub fn submit(&mut self, is_loading: bool) -> Option<String> {
        if !self.can_submit(is_loading) {
            return None;
        }
        let prompt = self.text().trim().to_string();
        self.clear();
        Some(prompt)
    }
}
