use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    entities::{
        contact_message::ContactSubmission,
        site_config::SiteConfiguration,
        skill::{Skill, SkillCategory},
    },
    errors::AppError,
    interfaces::dispatcher::{PageOutcome, SiteRequest},
    utils::{
        forms::{is_urlencoded, FormData},
        markdown::safe_markdown_to_html,
    },
    AppState,
};

/// Site configuration with media references resolved, or the defaults.
async fn site(state: &AppState) -> Result<SiteConfiguration, AppError> {
    let mut site = state.site_handler.current_or_default().await?;
    site.profile_image_url = state.config.media.resolve(&site.profile_image_url);
    Ok(site)
}

/// The defaults, for pages that must render without touching the database.
pub fn site_stub() -> Value {
    json!(SiteConfiguration::unsaved())
}

fn page(state: &AppState, template: &'static str, site: SiteConfiguration, extra: Value) -> PageOutcome {
    let mut context = json!({
        "page": template,
        "site": site,
        "static_url": state.config.static_files.url_prefix(),
        "language_code": state.config.site.language_code,
    });
    if let (Some(base), Value::Object(extra)) = (context.as_object_mut(), extra) {
        base.extend(extra);
    }
    PageOutcome { template, context }
}

pub async fn home(state: &AppState) -> Result<PageOutcome, AppError> {
    let site = site(state).await?;
    let featured_skills = state.skill_handler.featured_skills().await?;
    let mut featured_projects = state.project_handler.featured_projects().await?;
    for project in &mut featured_projects {
        project.image_url = state.config.media.resolve(&project.image_url);
    }

    Ok(page(state, "home", site, json!({
        "featured_skills": featured_skills,
        "featured_projects": featured_projects,
    })))
}

#[derive(Serialize)]
struct SkillGroup {
    category: SkillCategory,
    label: &'static str,
    skills: Vec<Skill>,
}

fn group_skills(skills: Vec<Skill>) -> Vec<SkillGroup> {
    SkillCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let skills: Vec<Skill> = skills.iter().filter(|s| s.category == category).cloned().collect();
            (!skills.is_empty()).then(|| SkillGroup { category, label: category.label(), skills })
        })
        .collect()
}

pub async fn about(state: &AppState) -> Result<PageOutcome, AppError> {
    let site = site(state).await?;
    let about_html = safe_markdown_to_html(&site.about_text);
    let skills = state.skill_handler.list_skills().await?;

    Ok(page(state, "about", site, json!({
        "about_html": about_html,
        "skill_groups": group_skills(skills),
    })))
}

/// Reads the posted fields. Unreadable bodies count as an empty submission.
pub fn read_form(req: &SiteRequest) -> FormData {
    if is_urlencoded(req.content_type()) {
        FormData::parse(&req.body)
    } else {
        tracing::warn!(content_type = ?req.content_type(), "Unsupported form encoding, treating as empty");
        FormData::default()
    }
}

pub fn contact_submission(form: &FormData) -> ContactSubmission {
    ContactSubmission {
        name: form.get("name").map(str::to_string),
        lastname: form.get("lastname").map(str::to_string),
        email: form.get("email").map(str::to_string),
        message: form.get("message").map(str::to_string),
    }
}

pub async fn contact(state: &AppState, req: &SiteRequest) -> Result<PageOutcome, AppError> {
    let site = site(state).await?;

    if req.method != actix_web::http::Method::POST {
        return Ok(page(state, "contact", site, json!({ "message_sent": false })));
    }

    let submission = contact_submission(&read_form(req));
    // Submissions are only echoed back; nothing is stored or mailed.
    tracing::info!(
        email = submission.email.as_deref().unwrap_or(""),
        "Contact form submitted (not persisted)"
    );

    Ok(page(state, "contact", site, json!({
        "message_sent": true,
        "form_data": submission,
    })))
}

pub async fn students(state: &AppState) -> Result<PageOutcome, AppError> {
    let site = site(state).await?;
    let listing = state.student_handler.list_students().await?;

    let students: Vec<Value> = listing
        .students
        .iter()
        .map(|student| {
            json!({
                "student_id": student.student_id,
                "name_prefix": student.name_prefix,
                "prefix_title": student.name_prefix.title(),
                "first_name": student.first_name,
                "last_name": student.last_name,
                "full_name": student.full_name(),
            })
        })
        .collect();

    Ok(page(state, "students", site, json!({
        "students": students,
        "total_students": listing.total_students,
    })))
}

const DEMO_ITEMS: [&str; 6] = [
    "HTML & CSS",
    "JavaScript & React",
    "Python & Django",
    "Bootstrap Framework",
    "Git & GitHub",
    "Database Design",
];

#[derive(Serialize)]
struct DemoStudent {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    score: u8,
    grade: &'static str,
}

#[derive(Serialize)]
struct DemoProject {
    name: &'static str,
    description: &'static str,
    technologies: &'static [&'static str],
    status: &'static str,
    progress: u8,
    created_date: Option<NaiveDate>,
}

pub fn grade_for(score: u8) -> &'static str {
    match score {
        80..=u8::MAX => "A",
        70..=79 => "B",
        60..=69 => "C",
        50..=59 => "D",
        _ => "F",
    }
}

fn demo_students() -> Vec<DemoStudent> {
    [
        ("สมชาย", "ใจดี", "somchai@email.com", 85),
        ("สมหญิง", "รักเรียน", "somying@email.com", 92),
        ("กิตติ", "ขยันเรียน", "kitti@email.com", 78),
        ("อนุชา", "ปรีชา", "anucha@email.com", 95),
        ("มาลี", "สวยงาม", "mali@email.com", 67),
    ]
    .into_iter()
    .map(|(first_name, last_name, email, score)| DemoStudent {
        first_name,
        last_name,
        email,
        score,
        grade: grade_for(score),
    })
    .collect()
}

fn demo_projects() -> Vec<DemoProject> {
    vec![
        DemoProject {
            name: "E-Commerce Website",
            description: "ระบบขายของออนไลน์",
            technologies: &["Django", "PostgreSQL", "Bootstrap"],
            status: "completed",
            progress: 100,
            created_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        },
        DemoProject {
            name: "Portfolio Website",
            description: "เว็บไซต์แสดงผลงาน",
            technologies: &["HTML", "CSS", "JavaScript"],
            status: "completed",
            progress: 100,
            created_date: NaiveDate::from_ymd_opt(2024, 2, 10),
        },
        DemoProject {
            name: "Mobile App",
            description: "แอพพลิเคชันมือถือ",
            technologies: &["React Native", "Firebase"],
            status: "in_progress",
            progress: 75,
            created_date: NaiveDate::from_ymd_opt(2024, 3, 5),
        },
        DemoProject {
            name: "Data Dashboard",
            description: "แดชบอร์ดแสดงข้อมูล",
            technologies: &["Python", "Streamlit", "Pandas"],
            status: "pending",
            progress: 25,
            created_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        },
    ]
}

pub async fn for_loop(state: &AppState, req: &SiteRequest) -> Result<PageOutcome, AppError> {
    let site = site(state).await?;

    let selected_skills = if req.method == actix_web::http::Method::POST {
        read_form(req).get_all("skills")
    } else {
        Vec::new()
    };

    Ok(page(state, "for_loop", site, json!({
        "items": DEMO_ITEMS,
        "students": demo_students(),
        "projects": demo_projects(),
        "count": (1..=12).collect::<Vec<u32>>(),
        "selected_skills": selected_skills,
    })))
}
