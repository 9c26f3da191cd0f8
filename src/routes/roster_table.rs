use crate::{
    data::student::Student,
    error::RosterResult,
    maud_conveniences::{escape, render_table, toast_trigger},
    roster_view::{RosterQuery, RosterView, programs},
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use maud::{Markup, html};
use serde::Deserialize;

/// Renders an already-filtered roster.
pub fn render_students_table(students: Vec<Student>) -> Markup {
    render_table(
        "Students",
        [
            "Student ID",
            "Name",
            "Gender",
            "Gmail",
            "Program",
            "Year Level",
            "University",
            "",
        ],
        students
            .into_iter()
            .map(|Student { id, details }| {
                [
                    escape(details.student_id),
                    escape(details.name),
                    escape(details.gender),
                    escape(details.gmail),
                    escape(details.program),
                    escape(details.year_level),
                    escape(details.university),
                    html! {
                        button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" title="Delete" hx-delete={"/internal/students/" (id)} hx-confirm="Are you sure? This action cannot be undone." hx-swap="none" {
                            "Delete"
                        }
                    },
                ]
            })
            .collect(),
        "No students found.",
    )
}

pub async fn internal_get_students_table(
    State(state): State<RosterState>,
    Query(query): Query<RosterQuery>,
) -> RosterResult<Markup> {
    let roster = state.store().list().await?;
    let view = RosterView::from(query);

    Ok(render_students_table(view.apply(roster)))
}

#[derive(Deserialize)]
pub struct ProgramOptionsQuery {
    #[serde(default)]
    program: String,
}

pub fn render_program_options(programs: &[String], selected: &str) -> Markup {
    html! {
        option value="" selected[selected.is_empty()] {"All Courses"}
        @for program in programs {
            option value=(program) selected[program == selected] {(program)}
        }
    }
}

pub async fn internal_get_program_options(
    State(state): State<RosterState>,
    Query(ProgramOptionsQuery { program }): Query<ProgramOptionsQuery>,
) -> RosterResult<Markup> {
    let roster = state.store().list().await?;
    Ok(render_program_options(&programs(&roster), &program))
}

pub async fn internal_delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<impl IntoResponse> {
    let removed = state.store().remove_by_id(&id).await?;
    info!(id = %removed.id, "Deleted student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok((toast_trigger("Student deleted.", true, true), html! {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::student::{StudentDetails, StudentRecord},
        test_utils::{TestApp, read_text},
    };
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn record(student_id: &str, name: &str, gender: &str, program: &str) -> StudentRecord {
        StudentDetails {
            student_id: student_id.into(),
            name: name.into(),
            gmail: "x@school.edu".into(),
            gender: gender.into(),
            program: program.into(),
            year_level: "1st Year".into(),
            university: "State University".into(),
        }
        .into()
    }

    async fn seeded_app() -> TestApp {
        let app = TestApp::new();
        for r in [
            record("S1", "Carl", "Male", "BSIT"),
            record("S2", "Ann", "Female", "BSCS"),
            record("S3", "<Bea>", "Female", "BSIT"),
        ] {
            app.state.store().append(r).await.unwrap();
        }
        app
    }

    async fn get(app: &TestApp, uri: &str) -> String {
        let rsp = app
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(rsp.status(), StatusCode::OK);
        read_text(rsp).await
    }

    #[tokio::test]
    async fn table_applies_query_filters() {
        let app = seeded_app().await;

        let html = get(&app, "/internal/students_table?filter=female&program=BSIT&search=").await;
        assert!(html.contains("&lt;Bea&gt;"));
        assert!(!html.contains("Ann"));
        assert!(!html.contains("Carl"));
    }

    #[tokio::test]
    async fn table_without_query_lists_everyone_in_order() {
        let app = seeded_app().await;

        let html = get(&app, "/internal/students_table").await;
        let carl = html.find("Carl").unwrap();
        let ann = html.find("Ann").unwrap();
        assert!(carl < ann);

        let sorted = get(&app, "/internal/students_table?filter=name").await;
        assert!(sorted.find("Ann").unwrap() < sorted.find("Carl").unwrap());
    }

    #[tokio::test]
    async fn empty_result_says_so() {
        let app = seeded_app().await;

        let html = get(&app, "/internal/students_table?search=zzz").await;
        assert!(html.contains("No students found."));
    }

    #[tokio::test]
    async fn program_options_keep_the_selection() {
        let app = seeded_app().await;

        let html = get(&app, "/internal/program_options?program=BSIT").await;
        assert!(html.contains(r#"<option value="BSCS">BSCS</option>"#));
        assert!(html.contains(r#"<option value="BSIT" selected>BSIT</option>"#));
        assert!(html.contains(r#"<option value="">All Courses</option>"#));
    }

    #[tokio::test]
    async fn delete_button_removes_and_triggers_refresh() {
        let app = seeded_app().await;
        let first = app.state.store().list().await.unwrap().remove(0);

        let rsp = app
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri(format!("/internal/students/{}", first.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(rsp.status(), StatusCode::OK);
        let trigger = rsp.headers()["HX-Trigger"].to_str().unwrap();
        assert!(trigger.contains("Student deleted."));
        assert!(trigger.contains("studentsChanged"));

        assert_eq!(app.state.store().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let app = seeded_app().await;
        let first = app.state.store().list().await.unwrap().remove(0);
        let uri = format!("/internal/students/{}", first.id);

        for expected in [StatusCode::OK, StatusCode::NOT_FOUND] {
            let rsp = app
                .router()
                .oneshot(
                    Request::builder()
                        .method(Method::DELETE)
                        .uri(&uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(rsp.status(), expected);
        }
    }
}
