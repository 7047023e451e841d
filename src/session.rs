//! 編集セッション
//!
//! キー入力を1つずつ受け取り、バッファ・カーソル・ビューポート・レンダラーを
//! 順に更新する状態機械。キーデバイスと表示デバイスに触れるのはここだけ。
//!
//! バッファ・ファイル操作のエラーはパネルにメッセージとして表示して編集を続ける。
//! デバイス（表示・入力）のエラーのみ `Err` として呼び出し元へ返す。

use crate::buffer::{CursorController, TextBuffer};
use crate::config::EditorConfig;
use crate::error::{MessageLevel, Result, StatusMessage};
use crate::file::{journal_file_name_now, FileStore, SaveReport};
use crate::input::{resolve, EditorCommand, Key, KeySource, Modifiers};
use crate::minibuffer::{FileList, PromptInput, PromptResult};
use crate::ui::{build_frame, DiffRenderer, DisplaySink, Frame, ViewportScroller, WINDOW_SIZE};
use std::thread;
use std::time::Duration;

/// 未保存のまま終了しようとしたときの確認文
pub const CONFIRM_QUIT_TEXT: &str = "Unsaved changes. Save before quitting? (y/n)";

const SAVE_LABEL: &str = "Save file as: ";
const OPEN_LABEL: &str = "Open file: ";

/// セッションの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// テキストバッファの容量
    pub capacity: usize,
    /// ステータスメッセージの表示時間（0なら待たない）
    pub message_hold: Duration,
}

impl SessionOptions {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            capacity: config.capacity,
            message_hold: config.message_hold(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

/// ファイル名入力の目的
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePurpose {
    /// 名前を付けて保存（`then_quit` なら保存後に終了）
    SaveAs { then_quit: bool },
    Open,
}

/// 入力待ちの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    FileName { input: PromptInput, purpose: FilePurpose },
    ConfirmQuit,
}

impl Prompt {
    fn file_name(purpose: FilePurpose) -> Self {
        let label = match purpose {
            FilePurpose::SaveAs { .. } => SAVE_LABEL,
            FilePurpose::Open => OPEN_LABEL,
        };
        Prompt::FileName {
            input: PromptInput::new(label),
            purpose,
        }
    }

    fn frame(&self) -> (Frame, usize) {
        match self {
            Prompt::FileName { input, .. } => input.frame(),
            Prompt::ConfirmQuit => (
                Frame::from_text(CONFIRM_QUIT_TEXT),
                CONFIRM_QUIT_TEXT.len().min(WINDOW_SIZE - 1),
            ),
        }
    }
}

/// セッションの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Prompting(Prompt),
    Listing(FileList),
    /// 終了（以降のキーは無視）
    Quitting,
}

/// 編集セッション
pub struct EditSession<D, K, S> {
    display: D,
    keys: K,
    store: S,
    buffer: TextBuffer,
    cursor: CursorController,
    viewport: ViewportScroller,
    renderer: DiffRenderer,
    state: SessionState,
    /// 現在の文書名（未保存の新規文書なら `None`）
    document_name: Option<String>,
    /// 最後の読み込み・保存以降に変更があったか
    altered: bool,
    message_hold: Duration,
    last_message: Option<StatusMessage>,
}

impl<D: DisplaySink, K: KeySource, S: FileStore> EditSession<D, K, S> {
    pub fn new(display: D, keys: K, store: S, options: SessionOptions) -> Self {
        Self {
            display,
            keys,
            store,
            buffer: TextBuffer::with_capacity(options.capacity),
            cursor: CursorController::new(),
            viewport: ViewportScroller::new(),
            renderer: DiffRenderer::new(),
            state: SessionState::Editing,
            document_name: None,
            altered: false,
            message_hold: options.message_hold,
            last_message: None,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor_offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn insert_mode(&self) -> bool {
        self.cursor.insert_mode()
    }

    pub fn window_start(&self) -> usize {
        self.viewport.window_start()
    }

    /// 最後にパネルへ送ったフレーム
    pub fn last_frame(&self) -> &Frame {
        self.renderer.last_frame()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_altered(&self) -> bool {
        self.altered
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document_name.as_deref()
    }

    /// 最後に表示したステータスメッセージ
    pub fn last_message(&self) -> Option<&StatusMessage> {
        self.last_message.as_ref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_finished(&self) -> bool {
        self.state == SessionState::Quitting
    }

    /// セッションを分解して協調オブジェクトを取り出す
    pub fn into_parts(self) -> (D, K, S) {
        (self.display, self.keys, self.store)
    }

    /// パネルを消去して編集画面を描く
    pub fn start(&mut self) -> Result<()> {
        self.restore_editor()
    }

    /// 終了するまでキーを読み続ける
    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        while !self.is_finished() {
            let key = self.keys.next_key()?;
            let modifiers = self.keys.modifiers();
            self.handle_key(key, modifiers)?;
        }
        log::info!("session finished");
        Ok(())
    }

    /// キー1つを処理する
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        let state = std::mem::replace(&mut self.state, SessionState::Editing);
        match state {
            SessionState::Editing => self.handle_editing(key, modifiers),
            SessionState::Prompting(prompt) => self.handle_prompt(prompt, key, modifiers),
            SessionState::Listing(list) => self.handle_listing(list, key),
            SessionState::Quitting => {
                self.state = SessionState::Quitting;
                Ok(())
            }
        }
    }

    /// 文書を読み込み、カーソルを末尾へ置く
    ///
    /// 失敗してもバッファは変更されない
    pub fn open_document(&mut self, name: &str) -> Result<()> {
        let bytes = match self.store.load(Some(name)) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::error!("failed to load {}: {}", name, error);
                return self.show_message(StatusMessage::failure(
                    "Error loading file:",
                    &error.into(),
                ));
            }
        };

        let report = self.buffer.load_from(&bytes);
        self.document_name = Some(name.trim().to_string());
        self.altered = false;
        self.cursor.move_to(self.buffer.used_len(), &self.buffer);
        self.viewport.reset();
        self.viewport.reconcile(self.cursor.offset());
        self.viewport.clamp_to_content(self.buffer.used_len());

        let detail = if report.truncated {
            log::warn!("{} truncated to {} bytes", name, report.loaded);
            format!("Truncated to {} bytes", report.loaded)
        } else {
            String::new()
        };
        self.show_message(StatusMessage::info(format!("Loaded {}", name.trim()), detail))
    }

    fn handle_editing(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        let command = resolve(key, modifiers);
        log::debug!("key {} -> {:?}", key, command);

        match command {
            EditorCommand::Type(byte) => match self.cursor.type_char(&mut self.buffer, byte) {
                Ok(()) => {
                    self.altered = true;
                    self.refresh()
                }
                Err(error) => {
                    log::warn!("keystroke dropped: {}", error);
                    self.show_message(StatusMessage::from_error(&error.into()))
                }
            },
            EditorCommand::Backspace => match self.cursor.backspace(&mut self.buffer) {
                Ok(true) => {
                    self.altered = true;
                    self.refresh_clamped()
                }
                Ok(false) => self.refresh(),
                Err(error) => self.show_message(StatusMessage::from_error(&error.into())),
            },
            EditorCommand::MoveLeft => {
                self.cursor.move_left(&self.buffer);
                self.refresh()
            }
            EditorCommand::MoveRight => {
                self.cursor.move_right(&self.buffer);
                self.refresh()
            }
            EditorCommand::MoveLineUp => {
                self.cursor.move_line_up(&self.buffer);
                self.refresh_clamped()
            }
            EditorCommand::MoveLineDown => {
                self.cursor.move_line_down(&self.buffer);
                self.refresh_clamped()
            }
            EditorCommand::ToggleInsertMode => {
                let state = if self.cursor.toggle_insert_mode() { "ON" } else { "OFF" };
                self.show_message(StatusMessage::info(format!("Insert Mode: {}", state), ""))
            }
            EditorCommand::Save => self.save_or_prompt(false),
            EditorCommand::Open => self.begin_prompt(Prompt::file_name(FilePurpose::Open)),
            EditorCommand::Browse => self.begin_browse(),
            EditorCommand::WordCount => {
                let count = self.buffer.word_count();
                self.show_message(StatusMessage::info(format!("Word Count: {}", count), ""))
            }
            EditorCommand::NewJournalEntry => self.new_journal_entry(),
            EditorCommand::Quit => self.request_quit(),
            EditorCommand::Ignore => Ok(()),
        }
    }

    fn handle_prompt(&mut self, prompt: Prompt, key: Key, modifiers: Modifiers) -> Result<()> {
        // 制御キーとの組み合わせは入力文字として扱わない
        let key = match key {
            Key::Char(_) if modifiers.control => Key::None,
            other => other,
        };

        match prompt {
            Prompt::ConfirmQuit => {
                if matches!(key, Key::Char(b'y') | Key::Char(b'Y')) {
                    self.save_or_prompt(true)
                } else {
                    self.finish();
                    Ok(())
                }
            }
            Prompt::FileName { mut input, purpose } => match input.handle_key(key) {
                PromptResult::InProgress => {
                    let prompt = Prompt::FileName { input, purpose };
                    self.draw_prompt(&prompt)?;
                    self.state = SessionState::Prompting(prompt);
                    Ok(())
                }
                PromptResult::Cancelled => match purpose {
                    FilePurpose::SaveAs { then_quit: true } => {
                        self.finish();
                        Ok(())
                    }
                    _ => self.restore_editor(),
                },
                PromptResult::Completed(name) => match purpose {
                    FilePurpose::Open => self.open_document(&name),
                    FilePurpose::SaveAs { then_quit } => self.save_as(&name, then_quit),
                },
            },
        }
    }

    fn handle_listing(&mut self, mut list: FileList, key: Key) -> Result<()> {
        match key {
            Key::Up => list.select_previous(),
            Key::Down => list.select_next(),
            Key::Enter => {
                let name = list.selected().to_string();
                return self.open_document(&name);
            }
            Key::Escape => {
                return self.show_message(StatusMessage::info("Selection cancelled.", ""));
            }
            _ => {}
        }

        let (frame, cursor) = list.frame();
        self.renderer.render(&mut self.display, &frame, cursor)?;
        self.state = SessionState::Listing(list);
        Ok(())
    }

    fn save_or_prompt(&mut self, then_quit: bool) -> Result<()> {
        match self.document_name.clone() {
            Some(name) => self.save_as(&name, then_quit),
            None => self.begin_prompt(Prompt::file_name(FilePurpose::SaveAs { then_quit })),
        }
    }

    fn save_as(&mut self, name: &str, then_quit: bool) -> Result<()> {
        let message = match self.write_document(name) {
            Ok(report) => {
                self.document_name = Some(report.name.clone());
                self.altered = false;
                StatusMessage::info(
                    format!("File saved as {}.", report.name),
                    format!("{} bytes written", report.bytes_written),
                )
            }
            Err(error) => {
                log::error!("failed to save {}: {}", name, error);
                StatusMessage::failure("Error saving file:", &error)
            }
        };

        self.show_message(message)?;
        if then_quit {
            self.finish();
        }
        Ok(())
    }

    fn write_document(&mut self, name: &str) -> Result<SaveReport> {
        let text = self.buffer.extract_used()?;
        Ok(self.store.save(Some(name), text.as_bytes())?)
    }

    fn begin_browse(&mut self) -> Result<()> {
        let names = match self.store.list_names() {
            Ok(names) => names,
            Err(error) => {
                log::error!("failed to list documents: {}", error);
                return self.show_message(StatusMessage::failure(
                    "Error loading file:",
                    &error.into(),
                ));
            }
        };

        match FileList::new(names) {
            Ok(list) => {
                self.display.clear()?;
                self.renderer.mark_cleared();
                let (frame, cursor) = list.frame();
                self.renderer.render(&mut self.display, &frame, cursor)?;
                self.state = SessionState::Listing(list);
                Ok(())
            }
            Err(error) => self.show_message(StatusMessage::from_error(&error.into())),
        }
    }

    fn new_journal_entry(&mut self) -> Result<()> {
        self.buffer.clear();
        self.cursor.reset();
        self.viewport.reset();
        self.document_name = None;
        self.altered = false;

        let name = journal_file_name_now();
        match self.store.save(Some(&name), &[]) {
            Ok(report) => {
                log::info!("new journal entry {}", report.name);
                self.document_name = Some(report.name.clone());
                self.show_message(StatusMessage::info("New journal entry saved as:", report.name))
            }
            Err(error) => {
                log::error!("failed to create journal entry {}: {}", name, error);
                self.show_message(StatusMessage::failure("Error saving file:", &error.into()))
            }
        }
    }

    fn request_quit(&mut self) -> Result<()> {
        if self.altered {
            self.begin_prompt(Prompt::ConfirmQuit)
        } else {
            self.finish();
            Ok(())
        }
    }

    fn finish(&mut self) {
        log::info!("quit requested");
        self.state = SessionState::Quitting;
    }

    fn begin_prompt(&mut self, prompt: Prompt) -> Result<()> {
        self.display.clear()?;
        self.renderer.mark_cleared();
        self.draw_prompt(&prompt)?;
        self.state = SessionState::Prompting(prompt);
        Ok(())
    }

    fn draw_prompt(&mut self, prompt: &Prompt) -> Result<()> {
        let (frame, cursor) = prompt.frame();
        self.renderer.render(&mut self.display, &frame, cursor)?;
        Ok(())
    }

    /// メッセージを表示し、一定時間後に編集画面へ戻す
    fn show_message(&mut self, message: StatusMessage) -> Result<()> {
        match message.level {
            MessageLevel::Info => log::debug!("status: {} {}", message.top, message.bottom),
            MessageLevel::Warning | MessageLevel::Error => {
                log::warn!("status: {} {}", message.top, message.bottom)
            }
        }

        let (top, bottom) = message.rows();
        self.display.clear()?;
        self.renderer.mark_cleared();
        self.renderer
            .render(&mut self.display, &Frame::from_rows(&top, &bottom), 0)?;
        self.last_message = Some(message);

        if !self.message_hold.is_zero() {
            thread::sleep(self.message_hold);
        }
        self.restore_editor()
    }

    fn restore_editor(&mut self) -> Result<()> {
        self.display.clear()?;
        self.renderer.mark_cleared();
        self.refresh()
    }

    /// 横方向の操作・入力の後の再描画
    fn refresh(&mut self) -> Result<()> {
        self.viewport.reconcile(self.cursor.offset());
        self.draw_editor()
    }

    /// 縦方向の移動と削除の後は末尾の空行も詰める
    fn refresh_clamped(&mut self) -> Result<()> {
        self.viewport.reconcile(self.cursor.offset());
        self.viewport.clamp_to_content(self.buffer.used_len());
        self.draw_editor()
    }

    fn draw_editor(&mut self) -> Result<()> {
        let span = self.viewport.visible_span(self.buffer.used_len());
        let frame = build_frame(&self.buffer, span);
        let cursor = self.viewport.cursor_screen_pos(self.cursor.offset());
        self.renderer.render(&mut self.display, &frame, cursor)?;
        Ok(())
    }
}
