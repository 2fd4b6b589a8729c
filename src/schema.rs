use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// One problem with one request field. Validation never stops at the first
/// failure; callers get the full list in one response.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// A resource type that can be validated from a request body and serialized
/// into its document collection.
pub trait Resource: Serialize + Sized {
    const COLLECTION: &'static str;

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>>;
}

fn push(errs: &mut Vec<FieldError>, field: &'static str, message: &str) {
    errs.push(FieldError {
        field,
        message: message.to_string(),
    });
}

fn required_str(body: &Value, field: &'static str, errs: &mut Vec<FieldError>) -> Option<String> {
    match body.get(field) {
        Some(Value::String(s)) => {
            let t = s.trim();
            if t.is_empty() {
                push(errs, field, "must not be empty");
                None
            } else {
                Some(t.to_string())
            }
        }
        Some(_) => {
            push(errs, field, "must be a string");
            None
        }
        None => {
            push(errs, field, "missing");
            None
        }
    }
}

// Absent, null, and blank all collapse to None.
fn optional_str(body: &Value, field: &'static str, errs: &mut Vec<FieldError>) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let t = s.trim().to_string();
            if t.is_empty() {
                None
            } else {
                Some(t)
            }
        }
        Some(_) => {
            push(errs, field, "must be a string or null");
            None
        }
    }
}

fn required_date(body: &Value, field: &'static str, errs: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let Some(raw) = required_str(body, field, errs) else {
        return None;
    };
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            push(errs, field, "must be a date in YYYY-MM-DD form");
            None
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub name: String,
    pub roll_no: String,
    pub class_name: String,
    pub section: Option<String>,
}

impl Resource for Student {
    const COLLECTION: &'static str = "student";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let name = required_str(body, "name", &mut errs);
        let roll_no = required_str(body, "roll_no", &mut errs);
        let class_name = required_str(body, "class_name", &mut errs);
        let section = optional_str(body, "section", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Student {
            name: name.unwrap_or_default(),
            roll_no: roll_no.unwrap_or_default(),
            class_name: class_name.unwrap_or_default(),
            section,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub subject: String,
    pub title: String,
    pub content: String,
    pub class_name: String,
}

impl Resource for Note {
    const COLLECTION: &'static str = "note";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let subject = required_str(body, "subject", &mut errs);
        let title = required_str(body, "title", &mut errs);
        let content = required_str(body, "content", &mut errs);
        let class_name = required_str(body, "class_name", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Note {
            subject: subject.unwrap_or_default(),
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            class_name: class_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub subject: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub class_name: String,
}

impl Resource for Assignment {
    const COLLECTION: &'static str = "assignment";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let subject = required_str(body, "subject", &mut errs);
        let title = required_str(body, "title", &mut errs);
        let description = required_str(body, "description", &mut errs);
        let due_date = required_date(body, "due_date", &mut errs);
        let class_name = required_str(body, "class_name", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Assignment {
            subject: subject.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            due_date: due_date.unwrap_or_default(),
            class_name: class_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Worksheet {
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    pub class_name: String,
}

impl Resource for Worksheet {
    const COLLECTION: &'static str = "worksheet";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let subject = required_str(body, "subject", &mut errs);
        let title = required_str(body, "title", &mut errs);
        let description = optional_str(body, "description", &mut errs);
        let class_name = required_str(body, "class_name", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Worksheet {
            subject: subject.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description,
            class_name: class_name.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Circular {
    pub title: String,
    pub message: String,
    /// Free-form audience tag, e.g. "all", "teachers", "class-6A".
    pub audience: String,
}

impl Resource for Circular {
    const COLLECTION: &'static str = "circular";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let title = required_str(body, "title", &mut errs);
        let message = required_str(body, "message", &mut errs);
        let audience = required_str(body, "audience", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Circular {
            title: title.unwrap_or_default(),
            message: message.unwrap_or_default(),
            audience: audience.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub title: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl Resource for Event {
    const COLLECTION: &'static str = "event";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let title = required_str(body, "title", &mut errs);
        let date = required_date(body, "date", &mut errs);
        let location = optional_str(body, "location", &mut errs);
        let description = optional_str(body, "description", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Event {
            title: title.unwrap_or_default(),
            date: date.unwrap_or_default(),
            location,
            description,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attendance {
    /// Student reference; an opaque string, not checked against the student
    /// collection.
    pub student_id: String,
    pub date: NaiveDate,
    pub status: String,
}

impl Resource for Attendance {
    const COLLECTION: &'static str = "attendance";

    fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut errs = Vec::new();
        let student_id = required_str(body, "student_id", &mut errs);
        let date = required_date(body, "date", &mut errs);
        let status = required_str(body, "status", &mut errs);
        if !errs.is_empty() {
            return Err(errs);
        }
        Ok(Attendance {
            student_id: student_id.unwrap_or_default(),
            date: date.unwrap_or_default(),
            status: status.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Upload {
    pub filename: String,
    pub path: String,
    pub uploaded_by: String,
    pub subject: Option<String>,
    pub class_name: Option<String>,
}

impl Upload {
    /// Uploads arrive as multipart form fields rather than a JSON body, so
    /// the record is assembled and checked at the upload route; only the
    /// collection name and the stored shape live here.
    pub const COLLECTION: &'static str = "upload";
}
