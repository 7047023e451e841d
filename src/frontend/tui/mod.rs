//! 端末上のパネルエミュレーション
//!
//! 2x40のパネルを枠付きの箱として描き、バスの転送時間を1バイトごとの待ちで再現する。
//! キー入力は crossterm のイベントをパネルのキートークンへ変換する。

use crate::error::{InputError, UiError};
use crate::input::{Key, KeySource, Modifiers};
use crate::ui::{DisplaySink, PanelDisplay, ROWS, ROW_WIDTH};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Position, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::thread;
use std::time::Duration;

/// 端末に描くパネル
pub struct TerminalDisplay {
    /// パネルの状態（端末へはここから描き直す）
    panel: PanelDisplay,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// 1バイトあたりの転送時間
    bus_delay: Duration,
}

impl TerminalDisplay {
    /// `enter_terminal` の後に呼ぶこと
    pub fn new(bus_delay: Duration) -> Result<Self, UiError> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;
        terminal.clear().map_err(|err| terminal_error("terminal clear", err))?;

        let mut display = Self {
            panel: PanelDisplay::new(),
            terminal,
            bus_delay,
        };
        display.draw()?;
        Ok(display)
    }

    pub fn panel(&self) -> &PanelDisplay {
        &self.panel
    }

    fn transfer(&self, bytes: usize) {
        if !self.bus_delay.is_zero() {
            thread::sleep(self.bus_delay * bytes as u32);
        }
    }

    fn draw(&mut self) -> Result<(), UiError> {
        let rows: Vec<String> = (0..ROWS).map(|row| self.panel.row(row)).collect();
        let cursor = self.panel.cursor();

        self.terminal
            .draw(|frame| {
                let area = panel_area(frame.area());
                let block = Block::default().borders(Borders::ALL).title("VFD");
                let inner = block.inner(area);
                let lines: Vec<Line> = rows.iter().map(|row| Line::from(row.as_str())).collect();
                frame.render_widget(Paragraph::new(lines).block(block), area);

                let (x, y) = cursor_cell(inner, cursor);
                frame.set_cursor_position(Position::new(x, y));
            })
            .map_err(|err| terminal_error("draw", err))?;
        Ok(())
    }
}

impl DisplaySink for TerminalDisplay {
    fn clear(&mut self) -> Result<(), UiError> {
        self.panel.clear()?;
        self.transfer(1);
        self.draw()
    }

    fn write(&mut self, text: &str) -> Result<(), UiError> {
        self.panel.write(text)?;
        self.transfer(text.len());
        self.draw()
    }

    fn set_cursor(&mut self, position: usize) -> Result<(), UiError> {
        self.panel.set_cursor(position)?;
        self.transfer(1);
        self.draw()
    }
}

/// 端末の中央に枠込みのパネル領域を取る
fn panel_area(area: Rect) -> Rect {
    let width = (ROW_WIDTH as u16 + 2).min(area.width);
    let height = (ROWS as u16 + 2).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn cursor_cell(inner: Rect, cursor: usize) -> (u16, u16) {
    let column = (cursor % ROW_WIDTH) as u16;
    let row = (cursor / ROW_WIDTH) as u16;
    (
        inner.x + column.min(inner.width.saturating_sub(1)),
        inner.y + row.min(inner.height.saturating_sub(1)),
    )
}

/// crossterm のキー入力
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalKeySource {
    modifiers: Modifiers,
}

impl TerminalKeySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for TerminalKeySource {
    fn next_key(&mut self) -> Result<Key, InputError> {
        loop {
            let event = event::read().map_err(|err| InputError::Device {
                message: format!("event read: {}", err),
            })?;
            match event {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    let (key, modifiers) = translate_key(key_event);
                    self.modifiers = modifiers;
                    return Ok(key);
                }
                Event::Key(_) | Event::Resize(_, _) => {}
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// crossterm のキーイベントをパネルのキーへ変換
pub fn translate_key(event: KeyEvent) -> (Key, Modifiers) {
    let modifiers = Modifiers {
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        control: event.modifiers.contains(KeyModifiers::CONTROL),
    };

    let key = match event.code {
        // Ctrl+Shift+文字は小文字で届く端末がある
        KeyCode::Char(ch) if modifiers.control && modifiers.shift => {
            Key::from_char(ch.to_ascii_uppercase()).unwrap_or(Key::None)
        }
        KeyCode::Char(ch) => Key::from_char(ch).unwrap_or(Key::None),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Insert => Key::Insert,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Esc => Key::Escape,
        _ => Key::None,
    };
    (key, modifiers)
}

/// rawモードと代替画面に入る
pub fn enter_terminal() -> Result<(), UiError> {
    enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

/// 端末を元に戻す
pub fn leave_terminal() -> Result<(), UiError> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

/// パニック時にも端末を元に戻してから報告する
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = leave_terminal();

        let message: &str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };
        let (file, line) = panic_info
            .location()
            .map(|location| (location.file(), location.line()))
            .unwrap_or(("<unknown>", 0));

        log::error!("panic at {}:{}: {}", file, line, message);
        eprintln!("PANIC at {}:{}: {}", file, line, message);
        std::process::exit(1);
    }));
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> UiError {
    UiError::Terminal {
        context: format!("{}: {}", context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_translate_printable_and_named_keys() {
        assert_eq!(
            translate_key(key_event(KeyCode::Char('a'), KeyModifiers::NONE)),
            (Key::Char(b'a'), Modifiers::NONE)
        );
        assert_eq!(translate_key(key_event(KeyCode::Enter, KeyModifiers::NONE)).0, Key::Enter);
        assert_eq!(translate_key(key_event(KeyCode::Esc, KeyModifiers::NONE)).0, Key::Escape);
        assert_eq!(translate_key(key_event(KeyCode::Insert, KeyModifiers::NONE)).0, Key::Insert);
        assert_eq!(translate_key(key_event(KeyCode::F(1), KeyModifiers::NONE)).0, Key::None);
    }

    #[test]
    fn test_translate_non_ascii_is_ignored() {
        let (key, _) = translate_key(key_event(KeyCode::Char('\u{e9}'), KeyModifiers::NONE));
        assert_eq!(key, Key::None);
    }

    #[test]
    fn test_translate_control_shift() {
        let (key, modifiers) = translate_key(key_event(
            KeyCode::Char('o'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(key, Key::Char(b'O'));
        assert_eq!(modifiers, Modifiers::CONTROL_SHIFT);

        let (key, modifiers) = translate_key(key_event(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(key, Key::Char(b's'));
        assert_eq!(modifiers, Modifiers::CONTROL);
    }

    #[test]
    fn test_panel_area_is_centered() {
        let area = panel_area(Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(19, 10, 42, 4));

        let small = panel_area(Rect::new(0, 0, 20, 2));
        assert_eq!(small, Rect::new(0, 0, 20, 2));
    }

    #[test]
    fn test_cursor_cell_maps_rows() {
        let inner = Rect::new(20, 11, 40, 2);
        assert_eq!(cursor_cell(inner, 0), (20, 11));
        assert_eq!(cursor_cell(inner, 39), (59, 11));
        assert_eq!(cursor_cell(inner, 41), (21, 12));
    }
}
