//! Server-rendered listing page.

use html_escape::{encode_double_quoted_attribute, encode_text};
use todo_shared::{Filter, Todo};

use crate::store::TodoCounts;

pub const APP_TITLE: &str = "Flask Todo App";

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
li{display:flex;gap:.5rem;align-items:baseline;padding:.25rem 0}\
li.completed .title{text-decoration:line-through;color:#888}\
.description{color:#555;font-size:.9em}\
nav a.current{font-weight:bold}";

pub fn index_page(todos: &[Todo], filter: Filter, counts: TodoCounts) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{APP_TITLE}</title>\n<style>{STYLE}</style>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{APP_TITLE}</h1>\n"));

    html.push_str(
        "<form method=\"post\" action=\"/add\">\n\
         <input type=\"text\" name=\"title\" placeholder=\"What needs to be done?\" required>\n\
         <input type=\"text\" name=\"description\" placeholder=\"Description (optional)\">\n\
         <button type=\"submit\">Add</button>\n\
         </form>\n",
    );

    html.push_str("<nav>");
    for f in Filter::ALL {
        let class = if f == filter { " class=\"current\"" } else { "" };
        html.push_str(&format!(" <a href=\"/?filter={f}\"{class}>{}</a>", label(f)));
    }
    html.push_str("</nav>\n");

    html.push_str(&format!(
        "<p class=\"counts\">{} total, {} active, {} completed</p>\n",
        counts.total, counts.active, counts.completed
    ));

    if todos.is_empty() {
        html.push_str("<p class=\"empty\">No todos here.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for todo in todos {
            html.push_str(&todo_item(todo));
        }
        html.push_str("</ul>\n");
    }

    if counts.completed > 0 {
        html.push_str("<p><a href=\"/clear-completed\">Clear completed</a></p>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn todo_item(todo: &Todo) -> String {
    let class = if todo.completed { "completed" } else { "active" };
    let toggle = if todo.completed { "Undo" } else { "Done" };
    let description = if todo.description.is_empty() {
        String::new()
    } else {
        format!(
            " <span class=\"description\">{}</span>",
            encode_text(&todo.description)
        )
    };

    format!(
        "<li class=\"{class}\" data-id=\"{id}\">\
         <a href=\"/toggle/{id}\">{toggle}</a> \
         <span class=\"title\" title=\"{created}\">{title}</span>\
         {description} <a href=\"/delete/{id}\">Delete</a></li>\n",
        id = todo.id,
        created = encode_double_quoted_attribute(&todo.created_at.to_rfc3339()),
        title = encode_text(&todo.title),
    )
}

fn label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Active => "Active",
        Filter::Completed => "Completed",
    }
}
