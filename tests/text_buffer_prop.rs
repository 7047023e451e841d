//! TextBuffer public API property tests
//!
//! Random edit sequences are checked against a plain `Vec<u8>` model; the buffer
//! must stay prefix-dense and its tracked length must match a full recount.

use proptest::test_runner::Config as ProptestConfig;
use proptest::{prelude::*, prop_oneof};
use vfdedit::buffer::{CursorController, TextBuffer, EMPTY_CELL};
use vfdedit::error::BufferError;

const CAPACITY: usize = 64;

#[derive(Debug, Clone)]
enum Operation {
    Insert { pos: usize, byte: u8 },
    Overwrite { pos: usize, byte: u8 },
    DeleteBefore { pos: usize },
}

#[derive(Debug, Clone)]
enum CursorOperation {
    Type(u8),
    Backspace,
    Left,
    Right,
    Up,
    Down,
    ToggleMode,
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    let insert = (0u16..96u16, 1u8..=255u8)
        .prop_map(|(pos, byte)| Operation::Insert { pos: pos as usize, byte });
    let overwrite = (0u16..96u16, 1u8..=255u8)
        .prop_map(|(pos, byte)| Operation::Overwrite { pos: pos as usize, byte });
    let delete = (0u16..96u16).prop_map(|pos| Operation::DeleteBefore { pos: pos as usize });

    prop_oneof![insert, overwrite, delete]
}

fn cursor_operation_strategy() -> impl Strategy<Value = CursorOperation> {
    prop_oneof![
        4 => (0x20u8..=0x7e).prop_map(CursorOperation::Type),
        1 => Just(CursorOperation::Type(b'\n')),
        2 => Just(CursorOperation::Backspace),
        1 => Just(CursorOperation::Left),
        1 => Just(CursorOperation::Right),
        1 => Just(CursorOperation::Up),
        1 => Just(CursorOperation::Down),
        1 => Just(CursorOperation::ToggleMode),
    ]
}

fn assert_prefix_dense(buffer: &TextBuffer) -> Result<(), TestCaseError> {
    prop_assert_eq!(buffer.recompute_used_length(), buffer.used_len());
    for offset in buffer.used_len()..buffer.capacity() {
        prop_assert_eq!(buffer.cell(offset), Some(EMPTY_CELL));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn text_buffer_operations_match_vec_model(
        ops in proptest::collection::vec(operation_strategy(), 0..200)
    ) {
        let mut buffer = TextBuffer::with_capacity(CAPACITY);
        let mut model: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                Operation::Insert { pos, byte } => {
                    let result = buffer.insert_at(pos, byte);
                    if model.len() == CAPACITY {
                        prop_assert_eq!(result, Err(BufferError::OutOfCapacity { capacity: CAPACITY }));
                    } else if pos > model.len() {
                        prop_assert_eq!(result, Err(BufferError::InvalidOffset { offset: pos, used: model.len() }));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model.insert(pos, byte);
                    }
                }
                Operation::Overwrite { pos, byte } => {
                    let result = buffer.overwrite_at(pos, byte);
                    if pos >= CAPACITY {
                        prop_assert_eq!(result, Err(BufferError::OutOfCapacity { capacity: CAPACITY }));
                    } else if pos > model.len() {
                        prop_assert_eq!(result, Err(BufferError::InvalidOffset { offset: pos, used: model.len() }));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        if pos == model.len() {
                            model.push(byte);
                        } else {
                            model[pos] = byte;
                        }
                    }
                }
                Operation::DeleteBefore { pos } => {
                    let result = buffer.delete_before(pos);
                    if pos == 0 {
                        prop_assert_eq!(result, Ok(None));
                    } else if pos > model.len() {
                        prop_assert_eq!(result, Err(BufferError::InvalidOffset { offset: pos, used: model.len() }));
                    } else {
                        let removed = model.remove(pos - 1);
                        prop_assert_eq!(result, Ok(Some(removed)));
                    }
                }
            }

            prop_assert_eq!(buffer.as_bytes(), model.as_slice());
            assert_prefix_dense(&buffer)?;
        }
    }

    #[test]
    fn cursor_stays_within_used_text(
        ops in proptest::collection::vec(cursor_operation_strategy(), 0..300)
    ) {
        let mut buffer = TextBuffer::with_capacity(CAPACITY);
        let mut cursor = CursorController::new();

        for op in ops {
            match op {
                CursorOperation::Type(byte) => {
                    let before = buffer.used_len();
                    match cursor.type_char(&mut buffer, byte) {
                        Ok(()) => {}
                        Err(error) => {
                            prop_assert_eq!(error, BufferError::OutOfCapacity { capacity: CAPACITY });
                            prop_assert_eq!(buffer.used_len(), before);
                        }
                    }
                }
                CursorOperation::Backspace => {
                    cursor.backspace(&mut buffer).unwrap();
                }
                CursorOperation::Left => cursor.move_left(&buffer),
                CursorOperation::Right => cursor.move_right(&buffer),
                CursorOperation::Up => cursor.move_line_up(&buffer),
                CursorOperation::Down => cursor.move_line_down(&buffer),
                CursorOperation::ToggleMode => {
                    cursor.toggle_insert_mode();
                }
            }

            prop_assert!(cursor.offset() <= buffer.used_len());
            prop_assert!(buffer.used_len() <= buffer.capacity());
            assert_prefix_dense(&buffer)?;
        }
    }

    #[test]
    fn load_pads_to_capacity(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let mut buffer = TextBuffer::with_capacity(CAPACITY);
        buffer.load_from(&[b'x'; CAPACITY]);
        let report = buffer.load_from(&bytes);

        let text_len = bytes.iter().position(|&byte| byte == 0).unwrap_or(bytes.len());
        let expected = text_len.min(CAPACITY);
        prop_assert_eq!(report.loaded, expected);
        prop_assert_eq!(report.truncated, expected < bytes.len());
        prop_assert_eq!(buffer.as_bytes(), &bytes[..expected]);
        prop_assert_eq!(buffer.capacity(), CAPACITY);
        assert_prefix_dense(&buffer)?;
    }
}
