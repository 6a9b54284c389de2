use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{AllocationRequest, FilterCriteria, Requirement, Room};

/// Style for the focused field, a placeholder, or a plain value.
fn field_style(is_active: bool, is_empty: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Yellow)
    } else if is_empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn text_line(field_name: &str, value: &str, placeholder: &str, is_active: bool) -> Line<'static> {
    let display = if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    };
    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, field_style(is_active, value.is_empty())),
    ])
}

fn toggle_line(field_name: &str, value: &str, is_active: bool) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(format!("< {value} >"), field_style(is_active, false)),
    ])
}

/// Internal representation of the "add room" form fields.
#[derive(Default, Clone)]
pub(crate) struct RoomForm {
    pub(crate) room_no: String,
    pub(crate) capacity: String,
    pub(crate) has_ac: bool,
    pub(crate) has_washroom: bool,
    pub(crate) active: RoomField,
    pub(crate) error: Option<String>,
}

/// Fields available within the room form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum RoomField {
    #[default]
    RoomNo,
    Capacity,
    Ac,
    Washroom,
}

impl RoomField {
    fn next(self) -> Self {
        match self {
            Self::RoomNo => Self::Capacity,
            Self::Capacity => Self::Ac,
            Self::Ac => Self::Washroom,
            Self::Washroom => Self::RoomNo,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::RoomNo => Self::Washroom,
            Self::Capacity => Self::RoomNo,
            Self::Ac => Self::Capacity,
            Self::Washroom => Self::Ac,
        }
    }
}

impl RoomForm {
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = self.active.prev();
    }

    /// Append a character to the active field. Space flips the toggles.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            RoomField::RoomNo => {
                if !ch.is_control() {
                    self.room_no.push(ch);
                    true
                } else {
                    false
                }
            }
            RoomField::Capacity => {
                if ch.is_ascii_digit() {
                    self.capacity.push(ch);
                    true
                } else {
                    false
                }
            }
            RoomField::Ac | RoomField::Washroom => {
                if ch == ' ' {
                    self.toggle();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Flip the focused toggle, if any.
    pub(crate) fn toggle(&mut self) {
        match self.active {
            RoomField::Ac => self.has_ac = !self.has_ac,
            RoomField::Washroom => self.has_washroom = !self.has_washroom,
            RoomField::RoomNo | RoomField::Capacity => {}
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            RoomField::RoomNo => {
                self.room_no.pop();
            }
            RoomField::Capacity => {
                self.capacity.pop();
            }
            RoomField::Ac | RoomField::Washroom => {}
        }
    }

    /// Validate the inputs and return a room ready for the store. Both text
    /// fields are checked so every problem is reported at once.
    pub(crate) fn parse_inputs(&self) -> Result<Room> {
        let room_no = self.room_no.trim();
        let capacity = self
            .capacity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|capacity| *capacity >= 1);

        let mut problems = Vec::new();
        if room_no.is_empty() {
            problems.push("Room number is required.");
        }
        if capacity.is_none() {
            problems.push("Capacity must be a positive number.");
        }
        match capacity {
            Some(capacity) if problems.is_empty() => {
                Ok(Room::new(room_no, capacity, self.has_ac, self.has_washroom)?)
            }
            _ => Err(anyhow!(problems.join(" "))),
        }
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        vec![
            text_line(
                "Room number",
                &self.room_no,
                "<required>",
                self.active == RoomField::RoomNo,
            ),
            text_line(
                "Capacity",
                &self.capacity,
                "<required>",
                self.active == RoomField::Capacity,
            ),
            toggle_line(
                "AC",
                if self.has_ac { "Has AC" } else { "No AC" },
                self.active == RoomField::Ac,
            ),
            toggle_line(
                "Washroom",
                if self.has_washroom {
                    "Has Washroom"
                } else {
                    "No Washroom"
                },
                self.active == RoomField::Washroom,
            ),
        ]
    }

    /// Cursor placement for text fields as (line index, column).
    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        match self.active {
            RoomField::RoomNo => Some((0, cursor_column("Room number", &self.room_no))),
            RoomField::Capacity => Some((1, cursor_column("Capacity", &self.capacity))),
            RoomField::Ac | RoomField::Washroom => None,
        }
    }
}

fn cursor_column(field_name: &str, value: &str) -> u16 {
    let column = field_name.chars().count() + 2 + value.chars().count();
    u16::try_from(column).unwrap_or(u16::MAX)
}

/// Search criteria as typed into the search tab.
#[derive(Default, Clone)]
pub(crate) struct SearchForm {
    pub(crate) min_capacity: String,
    pub(crate) ac: Requirement,
    pub(crate) washroom: Requirement,
    pub(crate) active: SearchField,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum SearchField {
    #[default]
    MinCapacity,
    Ac,
    Washroom,
}

impl SearchForm {
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            SearchField::MinCapacity => SearchField::Ac,
            SearchField::Ac => SearchField::Washroom,
            SearchField::Washroom => SearchField::MinCapacity,
        };
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = match self.active {
            SearchField::MinCapacity => SearchField::Washroom,
            SearchField::Ac => SearchField::MinCapacity,
            SearchField::Washroom => SearchField::Ac,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            SearchField::MinCapacity if ch.is_ascii_digit() => {
                self.min_capacity.push(ch);
                true
            }
            SearchField::Ac | SearchField::Washroom if ch == ' ' => {
                self.cycle(true);
                true
            }
            _ => false,
        }
    }

    /// Rotate the focused tri-state selector.
    pub(crate) fn cycle(&mut self, forward: bool) {
        let step = |value: Requirement| {
            if forward {
                value.cycle()
            } else {
                value.cycle_back()
            }
        };
        match self.active {
            SearchField::Ac => self.ac = step(self.ac),
            SearchField::Washroom => self.washroom = step(self.washroom),
            SearchField::MinCapacity => {}
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == SearchField::MinCapacity {
            self.min_capacity.pop();
        }
    }

    /// A blank minimum capacity means zero. Only digits can be typed, so a
    /// failed parse is an overflow and saturates.
    pub(crate) fn criteria(&self) -> FilterCriteria {
        let raw = self.min_capacity.trim();
        let min_capacity = if raw.is_empty() {
            0
        } else {
            raw.parse().unwrap_or(u32::MAX)
        };
        FilterCriteria::default()
            .min_capacity(min_capacity)
            .ac(self.ac)
            .washroom(self.washroom)
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        vec![
            text_line(
                "Min capacity",
                &self.min_capacity,
                "<any>",
                self.active == SearchField::MinCapacity,
            ),
            toggle_line("AC", self.ac.label(), self.active == SearchField::Ac),
            toggle_line(
                "Washroom",
                self.washroom.label(),
                self.active == SearchField::Washroom,
            ),
        ]
    }

    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        (self.active == SearchField::MinCapacity)
            .then(|| (0, cursor_column("Min capacity", &self.min_capacity)))
    }
}

/// Allocation request as typed into the allocate tab.
#[derive(Default, Clone)]
pub(crate) struct AllocateForm {
    pub(crate) students: String,
    pub(crate) needs_ac: bool,
    pub(crate) needs_washroom: bool,
    pub(crate) active: AllocateField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum AllocateField {
    #[default]
    Students,
    Ac,
    Washroom,
}

impl AllocateForm {
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            AllocateField::Students => AllocateField::Ac,
            AllocateField::Ac => AllocateField::Washroom,
            AllocateField::Washroom => AllocateField::Students,
        };
    }

    pub(crate) fn prev_field(&mut self) {
        self.active = match self.active {
            AllocateField::Students => AllocateField::Washroom,
            AllocateField::Ac => AllocateField::Students,
            AllocateField::Washroom => AllocateField::Ac,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            AllocateField::Students if ch.is_ascii_digit() => {
                self.students.push(ch);
                true
            }
            AllocateField::Ac | AllocateField::Washroom if ch == ' ' => {
                self.toggle();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn toggle(&mut self) {
        match self.active {
            AllocateField::Ac => self.needs_ac = !self.needs_ac,
            AllocateField::Washroom => self.needs_washroom = !self.needs_washroom,
            AllocateField::Students => {}
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.active == AllocateField::Students {
            self.students.pop();
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<AllocationRequest> {
        let students = self
            .students
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|students| *students >= 1)
            .ok_or_else(|| anyhow!("Enter a valid number of students (≥ 1)."))?;
        Ok(AllocationRequest {
            students,
            needs_ac: self.needs_ac,
            needs_washroom: self.needs_washroom,
        })
    }

    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let wanted = |flag: bool| if flag { "Yes" } else { "Any" };
        vec![
            text_line(
                "Students",
                &self.students,
                "<required>",
                self.active == AllocateField::Students,
            ),
            toggle_line(
                "AC required",
                wanted(self.needs_ac),
                self.active == AllocateField::Ac,
            ),
            toggle_line(
                "Washroom required",
                wanted(self.needs_washroom),
                self.active == AllocateField::Washroom,
            ),
        ]
    }

    pub(crate) fn cursor(&self) -> Option<(u16, u16)> {
        (self.active == AllocateField::Students)
            .then(|| (0, cursor_column("Students", &self.students)))
    }
}

/// Pending removal of a single room.
#[derive(Clone)]
pub(crate) struct ConfirmRoomDelete {
    pub(crate) room_no: String,
}

impl ConfirmRoomDelete {
    pub(crate) fn from(room: &Room) -> Self {
        Self {
            room_no: room.room_no().to_string(),
        }
    }
}

/// Pending wipe of the whole collection.
#[derive(Clone)]
pub(crate) struct ConfirmClearAll {
    pub(crate) count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut RoomForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn blank_room_number_is_rejected_by_form() {
        let mut form = RoomForm::default();
        type_into(&mut form, "   ");
        form.next_field();
        type_into(&mut form, "5");
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Room number is required.");
    }

    #[test]
    fn room_form_reports_every_invalid_field() {
        let form = RoomForm::default();
        assert_eq!(
            form.parse_inputs().unwrap_err().to_string(),
            "Room number is required. Capacity must be a positive number."
        );
    }

    #[test]
    fn cursor_column_saturates_on_huge_values() {
        let form = RoomForm {
            room_no: "9".repeat(70_000),
            ..RoomForm::default()
        };
        assert_eq!(form.cursor(), Some((0, u16::MAX)));
    }

    #[test]
    fn capacity_accepts_only_digits() {
        let mut form = RoomForm {
            active: RoomField::Capacity,
            ..RoomForm::default()
        };
        type_into(&mut form, "-1a2");
        assert_eq!(form.capacity, "12");
    }

    #[test]
    fn zero_capacity_is_rejected_by_form() {
        let form = RoomForm {
            room_no: "101".into(),
            capacity: "0".into(),
            ..RoomForm::default()
        };
        assert_eq!(
            form.parse_inputs().unwrap_err().to_string(),
            "Capacity must be a positive number."
        );
    }

    #[test]
    fn room_form_builds_room() {
        let mut form = RoomForm::default();
        type_into(&mut form, " 201 ");
        form.next_field();
        type_into(&mut form, "3");
        form.next_field();
        form.push_char(' ');
        let room = form.parse_inputs().unwrap();
        assert_eq!(room, Room::new("201", 3, true, false).unwrap());
    }

    #[test]
    fn field_focus_wraps() {
        let mut form = RoomForm::default();
        form.prev_field();
        assert_eq!(form.active, RoomField::Washroom);
        form.next_field();
        assert_eq!(form.active, RoomField::RoomNo);
    }

    #[test]
    fn blank_search_capacity_means_zero() {
        let form = SearchForm::default();
        assert_eq!(form.criteria(), FilterCriteria::default());
    }

    #[test]
    fn search_selectors_cycle() {
        let mut form = SearchForm::default();
        form.next_field();
        form.push_char(' ');
        assert_eq!(form.ac, Requirement::Required);
        form.cycle(true);
        assert_eq!(form.ac, Requirement::Excluded);
        form.cycle(false);
        assert_eq!(form.ac, Requirement::Required);
        assert_eq!(form.washroom, Requirement::DontCare);
    }

    #[test]
    fn oversized_search_capacity_saturates() {
        let form = SearchForm {
            min_capacity: "99999999999".into(),
            ..SearchForm::default()
        };
        assert_eq!(form.criteria().min_capacity, u32::MAX);
    }

    #[test]
    fn allocate_form_requires_positive_students() {
        let mut form = AllocateForm::default();
        assert!(form.parse_inputs().is_err());
        form.push_char('0');
        assert_eq!(
            form.parse_inputs().unwrap_err().to_string(),
            "Enter a valid number of students (≥ 1)."
        );
        form.backspace();
        form.push_char('4');
        form.next_field();
        form.push_char(' ');
        assert_eq!(
            form.parse_inputs().unwrap(),
            AllocationRequest {
                students: 4,
                needs_ac: true,
                needs_washroom: false,
            }
        );
    }
}
