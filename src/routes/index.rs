use crate::{
    maud_conveniences::{INPUT_CLASSES, STUDENTS_CHANGED_EVENT, title},
    roster_view::ListingFilter,
    routes::new_student::internal_get_new_student_form,
    state::RosterState,
};
use axum::extract::State;
use maud::{Markup, html};

const CHAT_SUGGESTIONS: [&str; 3] = [
    "How many students are enrolled?",
    "List all students in BSCS.",
    "Which students are in 1st Year?",
];

fn filters() -> Markup {
    html! {
        form id="filters" hx-get="/internal/students_table" hx-target="#students_table" hx-trigger="change, input changed delay:200ms from:#search_box" class="flex flex-row flex-wrap items-center gap-4 mb-4" {
            @for filter in ListingFilter::ALL {
                label class="flex items-center gap-1 cursor-pointer text-gray-300" {
                    input type="radio" name="filter" value=(filter.value()) checked[filter == ListingFilter::All];
                    (filter.label())
                }
            }
            select id="program" name="program" hx-get="/internal/program_options" hx-trigger={"load, sse:crud_student, " (STUDENTS_CHANGED_EVENT) " from:body"} hx-include="this" hx-target="this" hx-swap="innerHTML" class=(INPUT_CLASSES) style="width: auto" {
                option value="" {"All Courses"}
            }
            input type="search" id="search_box" name="search" placeholder="Search by name" class=(INPUT_CLASSES) style="width: auto";
        }
    }
}

fn chat_widget() -> Markup {
    html! {
        details class="fixed bottom-4 right-4 w-96 bg-gray-800 rounded shadow-xl" {
            summary class="cursor-pointer font-semibold p-4" {"Ask the roster assistant"}
            div class="p-4 flex flex-col gap-2" {
                div id="chat_history" class="flex flex-col gap-2 h-72 overflow-y-auto" {
                    div class="self-start bg-gray-700 rounded-lg px-3 py-2 max-w-[80%]" {
                        "Hi! Ask me anything about the students on the roster."
                    }
                }
                div class="flex flex-row flex-wrap gap-1" {
                    @for suggestion in CHAT_SUGGESTIONS {
                        button type="button" class="text-xs bg-slate-600 hover:bg-slate-800 rounded px-2 py-1" onclick="document.getElementById('chat_input').value = this.textContent" {
                            (suggestion)
                        }
                    }
                }
                form hx-post="/internal/chat" hx-target="#chat_history" hx-swap="beforeend scroll:bottom" hx-indicator="#chat_typing" "hx-on::after-request"="this.reset()" class="flex flex-row gap-2" {
                    input type="text" id="chat_input" name="message" autocomplete="off" placeholder="Type a question..." class=(INPUT_CLASSES);
                    button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {"Send"}
                }
                p id="chat_typing" class="htmx-indicator italic text-gray-400 text-sm" {"Thinking..."}
            }
        }
    }
}

pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    let form = internal_get_new_student_form().await;

    state.render(html! {
        div hx-ext="sse" sse-connect="/sse_feed" class="mx-auto flex flex-col lg:flex-row gap-8 w-full max-w-7xl" {
            div class="bg-gray-800 p-8 rounded shadow-md lg:w-96 shrink-0" {
                (form)
            }
            div class="bg-gray-800 p-8 rounded shadow-md grow" {
                div class="flex flex-row items-center justify-between" {
                    (title("Roster"))
                    a href="/students/export" class="bg-pink-600 hover:bg-pink-700 font-bold py-2 px-4 rounded" {"Download as CSV"}
                }
                (filters())
                div id="students_table" hx-get="/internal/students_table" hx-include="#filters" hx-trigger={"load, sse:crud_student, " (STUDENTS_CHANGED_EVENT) " from:body"} {}
            }
        }
        (chat_widget())
    })
}
