// SPDX-License-Identifier: MIT
//
// End-to-end behavior of a session driven through the public API, against
// a recording device that pretends to be a 24×80 terminal.
#![cfg(unix)]

use std::io;

use pretty_assertions::assert_eq;
use rawterm_core::attrs::{ControlFlags, InputFlags, LocalFlags, OutputFlags, TermAttrs};
use rawterm_core::{printf, Color, Config, Device, Session, Size};

struct Recorder {
    attrs: TermAttrs,
    size: Size,
    out: Vec<u8>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            attrs: TermAttrs {
                input: InputFlags::ICRNL | InputFlags::IXON,
                output: OutputFlags::OPOST,
                control: ControlFlags::CS8,
                local: LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG,
                vmin: 1,
                vtime: 0,
            },
            size: Size { rows: 24, cols: 80 },
            out: Vec::new(),
        }
    }
}

impl Device for Recorder {
    fn attributes(&mut self) -> io::Result<TermAttrs> {
        Ok(self.attrs)
    }

    fn set_attributes(&mut self, attrs: &TermAttrs) -> io::Result<()> {
        self.attrs = *attrs;
        Ok(())
    }

    fn window_size(&mut self) -> io::Result<Size> {
        Ok(self.size)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.extend_from_slice(bytes);
        Ok(())
    }
}

fn started(dev: &mut Recorder) -> Session<&mut Recorder> {
    let mut s = Session::new(dev, Config::default());
    s.initialize().unwrap();
    s
}

#[test]
fn dimensions_survive_drawing_calls() {
    let mut dev = Recorder::new();
    let mut s = started(&mut dev);
    assert_eq!((s.rows(), s.cols()), (24, 80));
    s.locate(100, 100);
    s.color(3, 3);
    assert_eq!((s.rows(), s.cols()), (24, 80));
}

#[test]
fn clear_then_flush() {
    let mut dev = Recorder::new();
    {
        let mut s = started(&mut dev);
        s.clear();
        s.flush();
    }
    assert_eq!(dev.out, [0x1b, 0x5b, 0x32, 0x4a, 0x1b, 0x5b, 0x48]);
}

#[test]
fn red_on_black_then_flush() {
    let mut dev = Recorder::new();
    {
        let mut s = started(&mut dev);
        s.color(4, 0);
        s.flush();
    }
    assert_eq!(dev.out, b"\x1b[31;40m");
}

#[test]
fn cleanup_round_trips_attributes() {
    let mut dev = Recorder::new();
    let before = dev.attrs;
    {
        let mut s = started(&mut dev);
        assert_ne!(*s.raw_attributes().unwrap(), before);
        s.cleanup();
    }
    assert_eq!(dev.attrs, before);
}

#[test]
fn drop_without_cleanup_still_restores() {
    let mut dev = Recorder::new();
    let before = dev.attrs;
    {
        let _s = started(&mut dev);
    }
    assert_eq!(dev.attrs, before);
}

#[test]
fn unflushed_output_never_reaches_the_device() {
    let mut dev = Recorder::new();
    {
        let mut s = started(&mut dev);
        s.print("pending");
    }
    assert!(dev.out.is_empty());
}

#[test]
fn full_frame() {
    let mut dev = Recorder::new();
    {
        let mut s = started(&mut dev);
        s.hide_cursor();
        s.clear();
        for (i, c) in Color::ALL.iter().enumerate().take(2) {
            let row = i32::try_from(i).unwrap() + 1;
            s.locate(row, 1);
            s.set_colors(Color::White, *c);
            printf!(s, "{:<6}", c.name());
        }
        s.show_cursor();
        s.flush();
    }
    let expected = b"\x1b[?25l\x1b[2J\x1b[H\
\x1b[1;1H\x1b[97;40mblack \
\x1b[2;1H\x1b[97;44mblue  \
\x1b[?25h";
    assert_eq!(String::from_utf8_lossy(&dev.out), String::from_utf8_lossy(expected));
}

#[test]
fn many_flushes_emit_in_order() {
    let mut dev = Recorder::new();
    {
        let mut s = started(&mut dev);
        for i in 0..500 {
            printf!(s, "{i},");
            if i % 97 == 0 {
                s.flush();
            }
        }
        s.flush();
    }
    let expected: String = (0..500).map(|i| format!("{i},")).collect();
    assert_eq!(String::from_utf8(dev.out).unwrap(), expected);
}
