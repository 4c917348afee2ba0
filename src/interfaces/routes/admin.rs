use actix_web::web;

use crate::handlers::{auth, contact_messages, projects, site_config, skills, students, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(web::resource("/login").route(web::post().to(auth::login)))
            .service(web::resource("/health").route(web::get().to(system::admin_health_check)))
            .service(
                web::scope("/skills")
                    .service(
                        web::resource("")
                            .route(web::get().to(skills::list_skills))
                            .route(web::post().to(skills::create_skill))
                    )
                    .service(
                        web::resource("/{skill_id}")
                            .route(web::get().to(skills::get_skill))
                            .route(web::put().to(skills::update_skill))
                            .route(web::delete().to(skills::delete_skill))
                    )
            )
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::get().to(projects::list_projects))
                            .route(web::post().to(projects::create_project))
                    )
                    .service(
                        web::resource("/{project_id}")
                            .route(web::get().to(projects::get_project))
                            .route(web::put().to(projects::update_project))
                            .route(web::delete().to(projects::delete_project))
                    )
            )
            .service(
                web::scope("/students")
                    .service(
                        web::resource("")
                            .route(web::get().to(students::list_students))
                            .route(web::post().to(students::create_student))
                    )
                    .service(
                        web::resource("/{student_id}")
                            .route(web::get().to(students::get_student))
                            .route(web::put().to(students::update_student))
                            .route(web::delete().to(students::delete_student))
                    )
            )
            .service(
                web::scope("/contact-messages")
                    .service(
                        web::resource("")
                            .route(web::get().to(contact_messages::list_messages))
                            .route(web::post().to(contact_messages::create_message))
                    )
                    .service(
                        web::resource("/{message_id}")
                            .route(web::get().to(contact_messages::get_message))
                            .route(web::put().to(contact_messages::update_message))
                            .route(web::delete().to(contact_messages::delete_message))
                    )
                    .service(
                        web::resource("/{message_id}/read")
                            .route(web::post().to(contact_messages::mark_read))
                    )
                    .service(
                        web::resource("/{message_id}/reply")
                            .route(web::post().to(contact_messages::mark_replied))
                    )
            )
            .service(
                web::scope("/site-configuration")
                    .service(
                        web::resource("")
                            .route(web::get().to(site_config::get_site_configuration))
                            .route(web::post().to(site_config::create_site_configuration))
                    )
                    .service(
                        web::resource("/{site_id}")
                            .route(web::put().to(site_config::update_site_configuration))
                    )
            )
    );
}

/// Admin routes for the `urls` command, in registration order.
pub const ADMIN_ROUTE_TABLE: &[(&str, &str)] = &[
    ("/admin/login", "POST"),
    ("/admin/health", "GET"),
    ("/admin/skills", "GET, POST"),
    ("/admin/skills/{skill_id}", "GET, PUT, DELETE"),
    ("/admin/projects", "GET, POST"),
    ("/admin/projects/{project_id}", "GET, PUT, DELETE"),
    ("/admin/students", "GET, POST"),
    ("/admin/students/{student_id}", "GET, PUT, DELETE"),
    ("/admin/contact-messages", "GET, POST"),
    ("/admin/contact-messages/{message_id}", "GET, PUT, DELETE"),
    ("/admin/contact-messages/{message_id}/read", "POST"),
    ("/admin/contact-messages/{message_id}/reply", "POST"),
    ("/admin/site-configuration", "GET, POST"),
    ("/admin/site-configuration/{site_id}", "PUT"),
];
