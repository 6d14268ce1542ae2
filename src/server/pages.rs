//! Server-rendered HTML pages for the catalog.

use crate::domain::model::{capitalize, Course, RawCourse, OPTIONAL_FIELDS, REQUIRED_FIELDS};
use crate::server::NoticeLevel;

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }
.notice { padding: 0.6rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.notice.success { background: #e6f4ea; color: #1e6b34; }
.notice.danger, .notice.error { background: #fdecea; color: #8a1c1c; }
form label { display: block; margin-top: 0.6rem; }
form input, form textarea { width: 100%; padding: 0.3rem; }
.inline { display: inline; }
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Percent-encodes a path segment such as a course code.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/catalog">Catalog</a>
        <a href="/add_course">Add course</a>
    </nav>
    <h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape_html(title),
        css = CSS,
        body = body,
    )
}

fn notice_html(notice: Option<(&str, NoticeLevel)>) -> String {
    match notice {
        Some((message, level)) => format!(
            r#"    <div class="notice {}">{}</div>
"#,
            level.as_str(),
            escape_html(message)
        ),
        None => String::new(),
    }
}

pub fn index_page() -> String {
    layout(
        "Course Catalog",
        r#"    <p>Browse the <a href="/catalog">course catalog</a> or <a href="/add_course">add a new course</a>.</p>"#,
    )
}

pub fn catalog_page(courses: &[Course], notice: Option<(&str, NoticeLevel)>) -> String {
    let mut body = notice_html(notice);

    if courses.is_empty() {
        body.push_str("    <p>No courses in the catalog yet.</p>\n");
        return layout("Course Catalog", &body);
    }

    body.push_str(
        "    <table>\n        <tr><th>Code</th><th>Name</th><th>Instructor</th><th>Semester</th><th>Schedule</th><th></th></tr>\n",
    );
    for course in courses {
        let code = encode_segment(&course.code);
        body.push_str(&format!(
            r#"        <tr>
            <td><a href="/course/{href}">{code}</a></td>
            <td>{name}</td>
            <td>{instructor}</td>
            <td>{semester}</td>
            <td>{schedule}</td>
            <td><form class="inline" method="post" action="/delete_course/{href}"><button type="submit">Delete</button></form></td>
        </tr>
"#,
            href = code,
            code = escape_html(&course.code),
            name = escape_html(&course.name),
            instructor = escape_html(&course.instructor),
            semester = escape_html(&course.semester),
            schedule = escape_html(&course.schedule),
        ));
    }
    body.push_str("    </table>\n");

    layout("Course Catalog", &body)
}

/// 新增課程表單；被拒絕時帶回原本的輸入與錯誤
pub fn add_course_page(values: &RawCourse, errors: &[String]) -> String {
    let mut body = String::new();
    for error in errors {
        body.push_str(&notice_html(Some((error, NoticeLevel::Error))));
    }

    body.push_str("    <form method=\"post\" action=\"/add_course\">\n");
    for field in REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        let value = values.get(*field).map(String::as_str).unwrap_or("");
        let required = if REQUIRED_FIELDS.contains(field) {
            " required"
        } else {
            ""
        };
        let input = if *field == "description" {
            format!(
                r#"<textarea id="{field}" name="{field}" rows="4">{value}</textarea>"#,
                field = field,
                value = escape_html(value)
            )
        } else {
            format!(
                r#"<input id="{field}" name="{field}" value="{value}"{required}>"#,
                field = field,
                value = escape_html(value),
                required = required
            )
        };
        body.push_str(&format!(
            "        <label for=\"{}\">{}</label>\n        {}\n",
            field,
            capitalize(field),
            input
        ));
    }
    body.push_str("        <p><button type=\"submit\">Add course</button></p>\n    </form>\n");

    layout("Add Course", &body)
}

pub fn course_details_page(course: &Course) -> String {
    let mut body = String::from("    <dl>\n");
    for field in REQUIRED_FIELDS.iter().chain(OPTIONAL_FIELDS.iter()) {
        let value = course.field(field).unwrap_or("");
        body.push_str(&format!(
            "        <dt>{}</dt><dd>{}</dd>\n",
            capitalize(field),
            escape_html(value)
        ));
    }
    body.push_str("    </dl>\n");
    body.push_str(&format!(
        r#"    <form method="post" action="/delete_course/{}"><button type="submit">Delete course</button></form>
"#,
        encode_segment(&course.code)
    ));

    layout(&format!("{} - {}", course.code, course.name), &body)
}
