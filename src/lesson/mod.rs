//! The pointer lesson
//!
//! [`run`] walks through the C listing in [`source::LESSON_SOURCE`] one
//! statement at a time, executing each against the checked memory model
//! and taking a snapshot after it. The Rust bindings in `run` hold aliases
//! (`&name`), never the values themselves, so every read and write goes
//! through the same checks a dereference would.

pub mod functions;
pub mod source;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::alias::Alias;
use crate::memory::value::Point;
use std::io::BufRead;

/// A line of the lesson listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
}

impl SourceLocation {
    pub fn new(line: usize) -> Self {
        SourceLocation { line }
    }
}

/// How the lesson is run
#[derive(Debug, Clone, Copy)]
pub struct LessonOptions {
    /// Dereference the dangling alias at the end (the unsafe variant)
    pub trigger_fault: bool,
    /// Mirror console output to stdout while running
    pub echo: bool,
    pub snapshot_limit: usize,
}

impl Default for LessonOptions {
    fn default() -> Self {
        LessonOptions {
            trigger_fault: false,
            echo: false,
            snapshot_limit: crate::interpreter::constants::SNAPSHOT_MEMORY_LIMIT,
        }
    }
}

/// Where the `scanf` step gets its answer
pub enum Input<'a> {
    /// Read a line interactively; the terminal echoes what was typed
    Reader(&'a mut dyn BufRead),
    /// A value given up front, echoed as if typed
    Text(String),
}

/// Parse the way `scanf("%d")` does: skip blanks, optional sign, digits
pub fn scan_int(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - sign_len);
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

/// Run the lesson's `main`
pub fn run(interp: &mut Interpreter, input: Input<'_>) -> Result<(), RuntimeError> {
    interp.step("int main(void)", |i| {
        i.memory_mut().push_frame("main");
        Ok(())
    })?;

    let pt1 = interp.step("int* pt1;", |i| {
        i.memory_mut().declare_uninit::<Alias<i32>>("pt1")
    })?;
    let pt2 = interp.step("double* pt2;", |i| {
        i.memory_mut().declare_uninit::<Alias<f64>>("pt2")
    })?;
    let a = interp.step("int a = 10;", |i| i.memory_mut().declare("a", 10))?;
    let b = interp.step("double b = PI;", |i| {
        i.memory_mut().declare("b", std::f64::consts::PI)
    })?;

    interp.step("pt1 = &a;", |i| {
        let address = i.memory().address_of::<i32>("a")?;
        i.memory_mut().write(pt1, address)
    })?;
    interp.step("pt2 = &b;", |i| {
        let address = i.memory().address_of::<f64>("b")?;
        i.memory_mut().write(pt2, address)
    })?;

    interp.step("a = %d lives at", |i| {
        let value = i.memory().read(a)?;
        let address = i.memory().read(pt1)?;
        i.print(&format!("a = {} lives at {}\n", value, address));
        Ok(())
    })?;
    interp.step("b = %lf lives at", |i| {
        let value = i.memory().read(b)?;
        let address = i.memory().read(pt2)?;
        i.print(&format!("b = {:.6} lives at {}\n", value, address));
        Ok(())
    })?;

    interp.step("*pt1 = *pt1 + 2;", |i| {
        let target = i.memory().read(pt1)?;
        let value = i.memory().read(target)?;
        i.memory_mut().write(target, value + 2)
    })?;
    interp.step("new value of a", |i| {
        let value = i.memory().read(a)?;
        i.print(&format!("new value of a: {}\n", value));
        Ok(())
    })?;
    interp.step("read through pt1", |i| {
        let target = i.memory().read(pt1)?;
        let value = i.memory().read(target)?;
        i.print(&format!("read through pt1: {}\n", value));
        Ok(())
    })?;

    let pt3 = interp.step("int* pt3 = NULL;", |i| {
        i.memory_mut().declare("pt3", Alias::<i32>::null())
    })?;
    interp.step("pt3 is not initialized", |i| {
        if i.memory().read(pt3)?.is_null() {
            i.print("pt3 is not initialized\n");
        }
        Ok(())
    })?;

    let u = interp.step("Point u;", |i| i.memory_mut().declare_uninit::<Point>("u"))?;
    interp.step("u.x = 10.4;", |i| i.memory_mut().write(u.x(), 10.4))?;
    interp.step("u.y = -23.4;", |i| i.memory_mut().write(u.y(), -23.4))?;
    let v = interp.step("Point v;", |i| i.memory_mut().declare_uninit::<Point>("v"))?;
    interp.step("v.x = 0;", |i| i.memory_mut().write(v.x(), 0.0))?;
    interp.step("v.y = 6.4;", |i| i.memory_mut().write(v.y(), 6.4))?;
    interp.step("distance between u and v", |i| {
        let u = i.memory().address_of::<Point>("u")?;
        let v = i.memory().address_of::<Point>("v")?;
        let d = functions::distance(i.memory(), u, v)?;
        i.print(&format!("distance between u and v: {:.6}\n", d));
        Ok(())
    })?;

    let x = interp.step("int x = 42;", |i| i.memory_mut().declare("x", 42))?;
    let y = interp.step("int y = 24;", |i| i.memory_mut().declare("y", 24))?;
    interp.step("before swap", |i| {
        let (xv, yv) = (i.memory().read(x)?, i.memory().read(y)?);
        i.print(&format!("before swap: x = {}, y = {}\n", xv, yv));
        Ok(())
    })?;
    interp.step("swap(&x, &y);", |i| functions::swap(i.memory_mut(), x, y))?;
    interp.step("after swap", |i| {
        let (xv, yv) = (i.memory().read(x)?, i.memory().read(y)?);
        i.print(&format!("after swap: x = {}, y = {}\n", xv, yv));
        Ok(())
    })?;

    let dangling = interp.step("int* dangling = dangling_local();", |i| {
        let returned = functions::dangling_local(i.memory_mut())?;
        i.memory_mut().declare("dangling", returned)
    })?;
    interp.step("dangling = %p (expired)", |i| {
        // Printing the pointer is fine; following it is not
        let pointer = i.memory().read(dangling)?;
        let state = if i.memory().is_valid(pointer) {
            "valid"
        } else {
            "expired"
        };
        i.print(&format!("dangling = {} ({})\n", pointer, state));
        Ok(())
    })?;
    interp.step("*global_alias()", |i| {
        let global = functions::global_alias(i.memory())?;
        let value = i.memory().read(global)?;
        i.print(&format!("global: {}\n", value));
        Ok(())
    })?;

    let pt4 = interp.step("int** pt4 = &pt1;", |i| {
        let address = i.memory().address_of::<Alias<i32>>("pt1")?;
        i.memory_mut().declare("pt4", address)
    })?;
    interp.step("**pt4", |i| {
        let to_pt1 = i.memory().read(pt4)?;
        let to_a = i.memory().read(to_pt1)?;
        let value = i.memory().read(to_a)?;
        i.print(&format!("a through a double pointer: {}\n", value));
        Ok(())
    })?;

    interp.step("Enter a number", |i| {
        i.print("Enter a number: ");
        Ok(())
    })?;
    interp.step("scanf(", |i| {
        let answer = match input {
            Input::Reader(reader) => {
                let mut line = String::new();
                // EOF or a read failure leaves the line empty, like a failed scanf
                let _ = reader.read_line(&mut line);
                if !line.ends_with('\n') {
                    line.push('\n');
                }
                i.record_input(&line);
                line
            }
            Input::Text(text) => {
                i.print(&format!("{}\n", text));
                text
            }
        };
        match scan_int(&answer) {
            Some(n) => {
                let address = i.memory().address_of::<i32>("a")?;
                i.memory_mut().write(address, n)
            }
            None => {
                i.print("(no number read, a keeps its value)\n");
                Ok(())
            }
        }
    })?;
    interp.step("you entered", |i| {
        let value = i.memory().read(a)?;
        i.print(&format!("you entered {}\n", value));
        Ok(())
    })?;

    if interp.options().trigger_fault {
        interp.step("*dangling);", |i| {
            let pointer = i.memory().read(dangling)?;
            let value = i.memory().read(pointer)?;
            i.print(&format!("dangling points at {}\n", value));
            Ok(())
        })?;
    }

    interp.step("return 0;", |i| i.memory_mut().pop_frame())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_int() {
        assert_eq!(scan_int("42\n"), Some(42));
        assert_eq!(scan_int("  -7 trailing"), Some(-7));
        assert_eq!(scan_int("+3"), Some(3));
        assert_eq!(scan_int("12abc"), Some(12));
        assert_eq!(scan_int("abc"), None);
        assert_eq!(scan_int("-"), None);
        assert_eq!(scan_int(""), None);
        assert_eq!(scan_int("99999999999"), None);
    }
}
