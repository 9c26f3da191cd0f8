use crate::{
    data::{
        student::{Student, StudentRecord},
        validation::StudentField,
    },
    error::{
        CsvSnafu, FlushCsvSnafu, InvalidJsonBodySnafu, MissingStudentIdOrNameSnafu, RosterResult,
    },
    routes::sse::SseEvent,
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};
use serde::Serialize;
use snafu::ResultExt;

#[derive(Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct AddedStudentResponse {
    message: &'static str,
    data: Student,
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<Vec<Student>>> {
    Ok(Json(state.store().list().await?))
}

pub async fn post_student(
    State(state): State<RosterState>,
    record: Result<Json<StudentRecord>, JsonRejection>,
) -> RosterResult<Json<AddedStudentResponse>> {
    let Json(record) = record.context(InvalidJsonBodySnafu)?;
    snafu::ensure!(record.has_required_fields(), MissingStudentIdOrNameSnafu);

    let student = state.store().append(record).await?;
    info!(id = %student.id, student_id = ?student.details.student_id, "Added student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(AddedStudentResponse {
        message: "Student added successfully",
        data: student,
    }))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<MessageResponse>> {
    let removed = state.store().remove_by_id(&id).await?;
    info!(id = %removed.id, "Deleted student");
    state.send_sse_event(SseEvent::CrudStudent);

    Ok(Json(MessageResponse {
        message: "Student deleted successfully",
    }))
}

pub fn students_to_csv(students: &[Student]) -> RosterResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    wtr.write_record(StudentField::ALL.map(StudentField::form_name))
        .context(CsvSnafu)?;
    for student in students {
        wtr.write_record(StudentField::ALL.map(|field| field.value(&student.details)))
            .context(CsvSnafu)?;
    }

    wtr.into_inner()
        .map_err(csv::IntoInnerError::into_error)
        .context(FlushCsvSnafu)
}

pub async fn export_students_csv(
    State(state): State<RosterState>,
) -> RosterResult<impl IntoResponse> {
    let students = state.store().list().await?;
    let csv = students_to_csv(&students)?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"students.csv\""),
        ],
        csv,
    ))
}
