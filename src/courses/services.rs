use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CourseChange, CourseQuery, CourseSummary, CreateCourseRequest, EditCourseRequest},
    repo_types::Course,
};
use crate::{
    db::StoreError, error::AppError, professors::repo_types::Professor, state::AppState,
};

async fn load_professor(st: &AppState, professor_id: Uuid) -> Result<Professor, AppError> {
    st.professors
        .find_by_id(professor_id)
        .await?
        .ok_or(AppError::ProfessorNotFound)
}

async fn load_course(st: &AppState, course_id: Uuid) -> Result<Course, AppError> {
    st.courses
        .find_by_id(course_id)
        .await?
        .ok_or(AppError::CourseNotFound)
}

/// Loads both sides of an ownership check and rejects non-owners.
async fn load_owned_course(
    st: &AppState,
    course_id: Uuid,
    professor_id: Uuid,
    denied: &str,
) -> Result<Course, AppError> {
    let professor = load_professor(st, professor_id).await?;
    let course = load_course(st, course_id).await?;
    if !course.is_owned_by(professor.id) {
        warn!(%course_id, %professor_id, owner_id = %course.professor_id, "ownership check failed");
        return Err(AppError::InvalidCourseUpdate(denied.to_string()));
    }
    Ok(course)
}

async fn persist(st: &AppState, course: &Course) -> Result<Course, AppError> {
    st.courses.save(course).await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => AppError::CourseAlreadyExists,
        other => other.into(),
    })
}

#[instrument(skip(st, req), fields(name = %req.name))]
pub async fn create_course(
    st: &AppState,
    professor_id: Uuid,
    req: CreateCourseRequest,
) -> Result<CourseSummary, AppError> {
    let professor = load_professor(st, professor_id).await?;

    if st.courses.exists_by_name_ignore_case(&req.name).await? {
        warn!("course name already taken");
        return Err(AppError::CourseAlreadyExists);
    }

    let now = OffsetDateTime::now_utc();
    let course = Course {
        id: Uuid::new_v4(),
        name: req.name,
        category: req.category,
        active: true,
        professor_id: professor.id,
        created_at: now,
        updated_at: now,
    };
    let saved = persist(st, &course).await?;

    info!(course_id = %saved.id, "course created");
    Ok(saved.into())
}

#[instrument(skip(st))]
pub async fn list_courses(st: &AppState, query: CourseQuery) -> Result<Vec<CourseSummary>, AppError> {
    let courses = st.courses.search(query.name(), query.category()).await?;
    Ok(courses.into_iter().map(CourseSummary::from).collect())
}

#[instrument(skip(st, req))]
pub async fn edit_course(
    st: &AppState,
    course_id: Uuid,
    professor_id: Uuid,
    req: EditCourseRequest,
) -> Result<CourseSummary, AppError> {
    let mut course =
        load_owned_course(st, course_id, professor_id, "You can only edit your own courses")
            .await?;

    match CourseChange::try_from(req)? {
        CourseChange::Name(name) => {
            // renaming to the current name (any case) is not a clash with itself
            let same_name = name.to_lowercase() == course.name.to_lowercase();
            if !same_name && st.courses.exists_by_name_ignore_case(&name).await? {
                warn!(%course_id, "course name already taken");
                return Err(AppError::CourseAlreadyExists);
            }
            course.name = name;
        }
        CourseChange::Category(category) => course.category = category,
    }
    course.updated_at = OffsetDateTime::now_utc();

    let saved = persist(st, &course).await?;
    info!(%course_id, "course edited");
    Ok(saved.into())
}

#[instrument(skip(st))]
pub async fn delete_course(
    st: &AppState,
    course_id: Uuid,
    professor_id: Uuid,
) -> Result<(), AppError> {
    let course = load_owned_course(
        st,
        course_id,
        professor_id,
        "You can only delete your own courses",
    )
    .await?;

    st.courses.delete_by_id(course.id).await?;
    info!(%course_id, "course deleted");
    Ok(())
}

#[instrument(skip(st))]
pub async fn toggle_course_active(
    st: &AppState,
    course_id: Uuid,
    professor_id: Uuid,
) -> Result<(), AppError> {
    let mut course =
        load_owned_course(st, course_id, professor_id, "You can only edit your own courses")
            .await?;

    course.active = !course.active;
    course.updated_at = OffsetDateTime::now_utc();
    let saved = persist(st, &course).await?;

    info!(%course_id, active = saved.active, "course active flag toggled");
    Ok(())
}
