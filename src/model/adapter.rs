// File: src/model/adapter.rs
use crate::model::item::{DateType, Task, TaskStatus};
use icalendar::{Calendar, Component, Property, Todo};

const PRODID: &str = "-//txt2ics//Export//EN";

fn date_property(key: &str, date: &DateType) -> Property {
    let mut prop = Property::new(key, &date.to_ical_value());
    if date.is_all_day() {
        prop.add_parameter("VALUE", "DATE");
    }
    prop
}

fn escape_list_item(item: &str) -> String {
    item.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
}

/// Inserts a raw `KEY:a,b,c` line right before `END:VTODO`.
fn inject_list(ics: String, key: &str, items: &[String]) -> String {
    if items.is_empty() {
        return ics;
    }
    let escaped: Vec<String> = items.iter().map(|i| escape_list_item(i)).collect();
    let line = format!("{}:{}", key, escaped.join(","));

    match ics.rfind("END:VTODO") {
        Some(idx) => {
            let (start, end) = ics.split_at(idx);
            let mut buffer = String::with_capacity(ics.len() + line.len() + 2);
            buffer.push_str(start);
            buffer.push_str(&line);
            buffer.push_str("\r\n");
            buffer.push_str(end);
            buffer
        }
        None => ics,
    }
}

impl Task {
    /// The VTODO without CATEGORIES/RESOURCES; those are added by [`Task::to_ics`].
    pub fn to_todo(&self) -> Todo {
        let mut todo = Todo::new();
        todo.uid(&self.uid);
        todo.summary(&self.summary);
        // DTSTAMP must be a UTC date-time.
        todo.append_property(date_property(
            "DTSTAMP",
            &DateType::Specific(self.dtstamp.to_utc()),
        ));

        // Needs-action is expressed by leaving STATUS out.
        if self.status != TaskStatus::NeedsAction {
            todo.add_property("STATUS", self.status.as_str());
        }
        if let Some(p) = self.ical_priority() {
            todo.priority(p);
        }
        if let Some(desc) = &self.description {
            todo.description(desc);
        }
        if let Some(loc) = &self.location {
            todo.add_property("LOCATION", loc);
        }

        for (key, date) in [
            ("CREATED", &self.created),
            ("COMPLETED", &self.completed),
            ("DTSTART", &self.start),
            ("DUE", &self.due),
        ] {
            if let Some(d) = date {
                todo.append_property(date_property(key, d));
            }
        }

        todo.done()
    }

    /// A complete single-task VCALENDAR.
    pub fn to_ics(&self) -> String {
        let mut calendar = Calendar::new();
        calendar.push(self.to_todo());
        let ics = calendar.to_string();

        let ics = inject_list(ics, "CATEGORIES", &self.categories);
        inject_list(ics, "RESOURCES", &self.resources)
    }
}

/// One VCALENDAR holding every task, in the given order.
pub fn to_ics_string(tasks: &[Task]) -> String {
    let mut output = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{}\r\n", PRODID);

    for task in tasks {
        let full_ics = task.to_ics();
        if let Some(start) = full_ics.find("BEGIN:VTODO")
            && let Some(end_idx) = full_ics.rfind("END:VTODO")
        {
            let vtodo = &full_ics[start..end_idx + "END:VTODO".len()];
            output.push_str(vtodo);
            output.push_str("\r\n");
        }
    }

    output.push_str("END:VCALENDAR\r\n");
    output
}
