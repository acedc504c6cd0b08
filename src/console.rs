// Librarium - Library Lending Demo
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Console output formatting for the demo driver
//!
//! Every task prints the same frame: a separator line, a bold cyan title,
//! a colored status on the same line, then the result body between
//! separators. Colors are raw ANSI escapes; no terminal detection.

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";

const SEPARATOR_WIDTH: usize = 60;

/// Outcome of one task, shown next to its title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    Failure,
}

fn status_parts(status: TaskStatus) -> (&'static str, &'static str) {
    match status {
        TaskStatus::Success => (GREEN, "COMPLETED"),
        TaskStatus::Failure => (RED, "FAILED"),
    }
}

fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}

/// Print the task title, leaving the line open for the status
pub fn task_title(title: &str) {
    println!();
    println!("{}", separator());
    print!("{}{}[TASK] {}{}", BOLD, CYAN, title, RESET);
}

/// Finish the title line with the task's status
pub fn task_status(status: TaskStatus) {
    let (color, label) = status_parts(status);
    println!("{}{} => {}{}", BOLD, color, label, RESET);
}

/// Print the result body between a header and a closing separator
pub fn task_result(body: &str) {
    println!("{}--- RESULT ---{}", BOLD, RESET);
    println!("{}", body);
    println!("{}", separator());
}
