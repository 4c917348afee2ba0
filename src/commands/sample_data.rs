use crate::{
    entities::{
        project::ProjectInput,
        site_config::SiteConfigurationInput,
        skill::{SkillCategory, SkillInput},
    },
    errors::AppError,
    startup::Application,
    AppState,
};

/// Names of rows created or found during seeding.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

impl SeedReport {
    fn record(&mut self, label: String, created: bool) {
        if created {
            println!("✅ Created {label}");
            self.created.push(label);
        } else {
            println!("⚠️  Already exists: {label}");
            self.existing.push(label);
        }
    }
}

fn sample_skills() -> Vec<SkillInput> {
    [
        ("Python", 90, SkillCategory::Backend, "fab fa-python", true),
        ("Django", 85, SkillCategory::Backend, "fab fa-python", true),
        ("JavaScript", 80, SkillCategory::Frontend, "fab fa-js-square", true),
        ("HTML5", 95, SkillCategory::Frontend, "fab fa-html5", true),
        ("CSS3", 90, SkillCategory::Frontend, "fab fa-css3-alt", true),
        ("Bootstrap", 85, SkillCategory::Frontend, "fab fa-bootstrap", false),
        ("PostgreSQL", 75, SkillCategory::Database, "fas fa-database", false),
        ("Git", 80, SkillCategory::Devops, "fab fa-git-alt", false),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, proficiency, category, icon, is_featured))| SkillInput {
        name: name.to_string(),
        proficiency,
        category,
        icon: icon.to_string(),
        is_featured,
        display_order: index as i64 + 1,
    })
    .collect()
}

fn sample_projects(technology_ids: &[i64]) -> Vec<ProjectInput> {
    let project = |title: &str, short: &str, description: &str, github: &str, demo: &str, featured: bool, order: i64| {
        ProjectInput {
            title: title.to_string(),
            description: description.to_string(),
            short_description: short.to_string(),
            image_url: String::new(),
            github_url: github.to_string(),
            demo_url: demo.to_string(),
            is_featured: featured,
            display_order: order,
            technology_ids: technology_ids.to_vec(),
        }
    };

    vec![
        project(
            "Django Portfolio Website",
            "เว็บไซต์ portfolio ส่วนตัวที่สร้างด้วย Django และ Bootstrap",
            "เว็บไซต์ portfolio ส่วนตัวที่แสดงผลงาน ทักษะ และข้อมูลติดต่อ พัฒนาด้วย Django framework และใช้ Bootstrap 5 สำหรับ responsive design มีระบบ admin สำหรับจัดการเนื้อหา",
            "https://github.com/username/portfolio",
            "https://portfolio.vercel.app",
            true,
            1,
        ),
        project(
            "Task Management System",
            "ระบบจัดการงานสำหรับทีม พัฒนาด้วย Django",
            "ระบบจัดการงานที่ช่วยให้ทีมสามารถติดตามความคืบหน้าของโปรเจค มีฟีเจอร์การแจ้งเตือน การมอบหมายงาน และรายงานผล",
            "https://github.com/username/task-management",
            "",
            true,
            2,
        ),
        project(
            "E-commerce API",
            "REST API สำหรับระบบอีคอมเมิร์ซ",
            "REST API ที่สมบูรณ์สำหรับระบบอีคอมเมิร์ซ มีระบบการจัดการสินค้า คำสั่งซื้อ ระบบชำระเงิน และระบบผู้ใช้งาน",
            "https://github.com/username/ecommerce-api",
            "",
            false,
            3,
        ),
    ]
}

const SAMPLE_ABOUT: &str = "สวัสดีครับ! ผมเป็น Full Stack Developer ที่มีความหลงใหลในการพัฒนาเว็บแอปพลิเคชัน

ผมมีประสบการณ์ในการทำงานกับเทคโนโลยีต่างๆ ทั้ง Frontend และ Backend รวมถึงการออกแบบ Database และ API

ความสนใจของผม:

- การพัฒนาเว็บแอปพลิเคชันที่มีประสิทธิภาพ
- การเรียนรู้เทคโนโลยีใหม่ๆ
- การแก้ปัญหาที่ซับซ้อน
- การสร้างประสบการณ์ผู้ใช้ที่ดี

ผมพร้อมที่จะร่วมงานกับทีมในการสร้างโซลูชันที่มีคุณภาพและตอบโจทย์ผู้ใช้งาน";

fn sample_site() -> SiteConfigurationInput {
    SiteConfigurationInput {
        site_title: "My Portfolio".into(),
        site_subtitle: "Full Stack Developer & Creative Thinker".into(),
        about_text: SAMPLE_ABOUT.into(),
        contact_email: "your.email@example.com".into(),
        contact_phone: "+66 xx xxx xxxx".into(),
        github_url: "https://github.com/yourusername".into(),
        linkedin_url: "https://linkedin.com/in/yourusername".into(),
        facebook_url: "https://facebook.com/yourusername".into(),
        twitter_url: "https://twitter.com/yourusername".into(),
        ..SiteConfigurationInput::default()
    }
}

/// Inserts the sample rows that are missing. Running it twice changes nothing.
pub async fn seed(state: &AppState) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();
    let mut technology_ids = Vec::new();

    for input in sample_skills() {
        let is_core = matches!(input.name.as_str(), "Python" | "Django");
        let (skill, created) = state.skill_handler.ensure_skill(input).await?;
        if is_core {
            technology_ids.push(skill.id);
        }
        report.record(format!("skill: {}", skill.name), created);
    }

    for input in sample_projects(&technology_ids) {
        let (project, created) = state.project_handler.ensure_project(input).await?;
        report.record(format!("project: {}", project.title), created);
    }

    let created = match state.site_handler.current().await? {
        Some(_) => false,
        None => {
            state.site_handler.create(sample_site()).await?;
            true
        }
    };
    report.record("site configuration".to_string(), created);

    if !report.created.is_empty() {
        state.invalidate_pages().await;
    }
    Ok(report)
}

pub async fn create_sample_data(app: &Application) -> anyhow::Result<()> {
    println!("🎯 Creating sample portfolio data...");
    let report = seed(&app.state).await?;

    println!("\n🎉 Sample data creation completed! ({} created, {} existing)", report.created.len(), report.existing.len());
    println!("💡 You can now:");
    println!("   - Use the /admin API to manage your content");
    println!("   - Edit the sample data as needed");
    println!("   - Add your own projects and skills");
    Ok(())
}
