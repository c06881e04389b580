use chip8_vm::FrameBuffer;

/// Renders the frame as text, one line per row: `#` lit, `.` unlit.
pub fn frame_to_text(frame: &FrameBuffer) -> String {
    let mut text = String::new();
    for row in frame.rows() {
        text.extend(row.iter().map(|&lit| if lit { '#' } else { '.' }));
        text.push('\n');
    }
    text
}
