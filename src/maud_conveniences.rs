use axum::response::AppendHeaders;
use maud::{Escaper, Markup, PreEscaped, Render, html};
use serde_json::json;
use std::fmt::Write;

pub fn render_table<const N: usize>(
    overall_title: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
    empty_message: &'static str,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (title(overall_title))
            div class="overflow-x-auto" {
                table class="min-w-full bg-gray-800 rounded shadow-md" {
                    thead class="bg-gray-700" {
                        tr {
                            @for title in titles {
                                th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                            }
                        }
                    }
                    tbody {
                        @if items.is_empty() {
                            tr {
                                td colspan=(N) class="py-4 px-4 text-center italic text-gray-400" {(empty_message)}
                            }
                        }
                        @for row in items {
                            tr {
                                @for col in row {
                                    td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn escape(s: impl AsRef<str>) -> PreEscaped<String> {
    let mut output = String::new();
    Escaper::new(&mut output).write_str(s.as_ref()).unwrap(); //this method always succeeds - strange api!
    PreEscaped(output)
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";
pub const INVALID_INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-red-500";

/// A labelled input with room for a validation message underneath.
pub fn form_element(id: &str, label: &str, error: Option<&str>, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
            p class="text-red-400 text-xs italic mt-1 min-h-4" {
                @if let Some(error) = error {
                    (error)
                }
            }
        }
    }
}

pub fn simple_form_element(id: &str, label: &str, value: &str, error: Option<&str>) -> Markup {
    let classes = if error.is_some() {
        INVALID_INPUT_CLASSES
    } else {
        INPUT_CLASSES
    };

    form_element(
        id,
        label,
        error,
        html! {
            input type="text" id=(id) name=(id) value=(value) class=(classes) {}
        },
    )
}

pub fn select_form_element(
    id: &str,
    label: &str,
    placeholder: &str,
    options: &[&str],
    selected: &str,
    error: Option<&str>,
) -> Markup {
    let classes = if error.is_some() {
        INVALID_INPUT_CLASSES
    } else {
        INPUT_CLASSES
    };

    form_element(
        id,
        label,
        error,
        html! {
            select id=(id) name=(id) class=(classes) {
                option value="" selected[selected.is_empty()] {(placeholder)}
                @for option in options {
                    option value=(option) selected[*option == selected] {(option)}
                }
            }
        },
    )
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

/// Name of the client-side event fired whenever the roster changed.
pub const STUDENTS_CHANGED_EVENT: &str = "studentsChanged";

/// `HX-Trigger` header that pops a toast, and optionally tells the page the roster changed.
pub fn toast_trigger(
    message: &str,
    ok: bool,
    students_changed: bool,
) -> AppendHeaders<[(&'static str, String); 1]> {
    let mut events = json!({ "showToast": { "message": message, "ok": ok } });
    if students_changed {
        events[STUDENTS_CHANGED_EVENT] = serde_json::Value::Null;
    }

    AppendHeaders([("HX-Trigger", events.to_string())])
}
