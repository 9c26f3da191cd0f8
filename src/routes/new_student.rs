use crate::{
    data::{
        student::{StudentDetails, StudentRecord},
        validation::{FieldErrors, StudentField, validate_student_form},
    },
    error::RosterResult,
    maud_conveniences::{
        form_submit_button, select_form_element, simple_form_element, title, toast_trigger,
    },
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{Form, extract::State, response::IntoResponse};
use maud::{Markup, html};

pub const GENDERS: [&str; 2] = ["Male", "Female"];
pub const YEAR_LEVELS: [&str; 4] = ["1st Year", "2nd Year", "3rd Year", "4th Year"];

pub fn render_student_form(details: &StudentDetails, errors: &FieldErrors) -> Markup {
    let field = |field: StudentField| {
        let error = errors.get(&field).copied();
        let value = field.value(details);
        match field {
            StudentField::Gender => select_form_element(
                field.form_name(),
                field.label(),
                "Select Gender",
                &GENDERS,
                value,
                error,
            ),
            StudentField::YearLevel => select_form_element(
                field.form_name(),
                field.label(),
                "Select Year Level",
                &YEAR_LEVELS,
                value,
                error,
            ),
            _ => simple_form_element(field.form_name(), field.label(), value, error),
        }
    };

    html! {
        div id="student_form" {
            (title("Add Student"))
            form novalidate hx-put="/internal/students/new_form" hx-trigger="submit" hx-target="#student_form" hx-swap="outerHTML" hx-confirm="Are you sure you want to add this student?" class="p-4" {
                @for f in StudentField::ALL {
                    (field(f))
                }
                (form_submit_button(Some("Add Student")))
            }
        }
    }
}

pub async fn internal_get_new_student_form() -> Markup {
    render_student_form(&StudentDetails::default(), &FieldErrors::new())
}

pub async fn internal_put_new_student(
    State(state): State<RosterState>,
    Form(details): Form<StudentDetails>,
) -> RosterResult<impl IntoResponse> {
    let details = match validate_student_form(details.clone()) {
        Ok(details) => details,
        Err(errors) => {
            return Ok((
                toast_trigger("Please correct errors above.", false, false),
                render_student_form(&details, &errors),
            ));
        }
    };

    let student = state.store().append(StudentRecord::from(details)).await?;
    info!(id = %student.id, student_id = ?student.details.student_id, "Added student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok((
        toast_trigger("Student added!", true, true),
        render_student_form(&StudentDetails::default(), &FieldErrors::new()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TestApp, read_text};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use tower::ServiceExt;

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::PUT)
            .uri("/internal/students/new_form")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_form_adds_and_resets() {
        let app = TestApp::new();

        let rsp = app
            .router()
            .oneshot(form_request(
                "studentId=2024-01&name=Ann+Lee&gmail=ann%40gmail.com&gender=Female&program=BSCS&yearLevel=1st+Year&university=State",
            ))
            .await
            .unwrap();
        assert_eq!(rsp.status(), StatusCode::OK);
        let trigger = rsp.headers()["HX-Trigger"].to_str().unwrap().to_string();
        assert!(trigger.contains("Student added!"));
        assert!(trigger.contains("studentsChanged"));

        let html = read_text(rsp).await;
        assert!(!html.contains("Ann Lee"));

        let students = app.state.store().list().await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].details.name, "Ann Lee");
        assert_eq!(students[0].details.gmail, "ann@gmail.com");
    }

    #[tokio::test]
    async fn invalid_form_is_blocked_with_field_errors() {
        let app = TestApp::new();

        let rsp = app
            .router()
            .oneshot(form_request(
                "studentId=S+1&name=Ann&gmail=nope&gender=Female&program=BSCS&yearLevel=&university=State",
            ))
            .await
            .unwrap();
        assert_eq!(rsp.status(), StatusCode::OK);
        let trigger = rsp.headers()["HX-Trigger"].to_str().unwrap().to_string();
        assert!(trigger.contains("Please correct errors above."));
        assert!(!trigger.contains("studentsChanged"));

        let html = read_text(rsp).await;
        assert!(html.contains("Student ID must contain only letters, numbers, and hyphens."));
        assert!(html.contains("Invalid email format."));
        assert!(html.contains("This field is required."));
        // what the user typed is kept
        assert!(html.contains(r#"value="nope""#));

        assert!(app.state.store().list().await.unwrap().is_empty());
    }

    #[test]
    fn form_asks_for_confirmation() {
        let html = render_student_form(&StudentDetails::default(), &FieldErrors::new()).into_string();
        assert!(html.contains("hx-confirm=\"Are you sure you want to add this student?\""));
        for field in StudentField::ALL {
            assert!(html.contains(&format!("name=\"{}\"", field.form_name())));
        }
    }
}
