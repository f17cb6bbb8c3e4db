use std::fmt::Write;

use crate::models::{Comment, Course, UploadedFile};

use super::capabilities::Capabilities;

pub const EMPTY_LIST: &str = "No se encontraron cursos";
pub const LOADING: &str = "Cargando...";
pub const ADD_COURSE: &str = "Añadir Curso";
pub const MY_COURSES: &str = "Mis Cursos";
pub const SUBSCRIBE: &str = "Inscribirse";
pub const MORE_INFO: &str = "+ Info";
pub const EDIT: &str = "Modificar";
pub const DELETE: &str = "Eliminar";

pub fn navbar(caps: &Capabilities) -> String {
    let action = if caps.can_create { ADD_COURSE } else { MY_COURSES };
    format!("[Inicio]  Busca algún curso...  [{}]", action)
}

/// Action labels a course card offers under `caps`, in display order.
pub fn card_actions(caps: &Capabilities) -> Vec<&'static str> {
    let mut actions = Vec::new();
    if caps.can_subscribe {
        actions.push(SUBSCRIBE);
    }
    if caps.can_open_details {
        actions.push(MORE_INFO);
    }
    if caps.can_edit {
        actions.push(EDIT);
    }
    if caps.can_delete {
        actions.push(DELETE);
    }
    actions
}

pub fn course_card(course: &Course, caps: &Capabilities) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {} ({})", course.id, course.title, course.category.to_uppercase());
    let _ = writeln!(out, "  {}", course.description);
    let _ = writeln!(out, "  Instructor: {}", course.instructor);
    let _ = writeln!(out, "  Duración: {} Semanas", course.duration);
    let _ = writeln!(out, "  Requisitos: {}", course.requirement);

    let actions = card_actions(caps);
    if !actions.is_empty() {
        let buttons: Vec<String> = actions.iter().map(|a| format!("[{}]", a)).collect();
        let _ = writeln!(out, "  {}", buttons.join(" "));
    }
    out
}

pub fn course_list(courses: &[Course], caps: &Capabilities) -> String {
    if courses.is_empty() {
        return format!("{}\n", EMPTY_LIST);
    }
    courses
        .iter()
        .map(|c| course_card(c, caps))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn course_detail(course: &Course, caps: &Capabilities) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", course.title);
    let _ = writeln!(out, "{}", course.description);
    let _ = writeln!(out, "Categoría: {}", course.category);
    let _ = writeln!(out, "Instructor: {}", course.instructor);
    let _ = writeln!(out, "Duración: {} semanas", course.duration);
    let _ = writeln!(out, "Requisitos: {}", course.requirement);

    let mut controls = Vec::new();
    if caps.can_edit {
        controls.push(format!("[{}]", EDIT));
    }
    if caps.can_delete {
        controls.push(format!("[{}]", DELETE));
    }
    if !controls.is_empty() {
        let _ = writeln!(out, "{}", controls.join(" "));
    }
    out
}

pub fn comments(comments: &[Comment]) -> String {
    let mut out = String::from("Comentarios de estudiantes\n");
    for comment in comments {
        match &comment.display_name {
            Some(name) => {
                let _ = writeln!(out, "  {}: {}", name, comment.comment);
            }
            None => {
                let _ = writeln!(out, "  {}", comment.comment);
            }
        }
    }
    out
}

pub fn files(files: &[UploadedFile]) -> String {
    let mut out = String::from("Archivos\n");
    for file in files {
        let date = file
            .upload_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "  {} {} {}", file.name, file.url, date);
    }
    out
}
