//! Skill catalog and the skills form submitted at the tech-stack stage.

use serde::{Deserialize, Serialize};

use crate::models::interview::SkillSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    Frontend,
    Backend,
    Databases,
    CloudDevops,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::Languages,
        SkillCategory::Frontend,
        SkillCategory::Backend,
        SkillCategory::Databases,
        SkillCategory::CloudDevops,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SkillCategory::Languages => "Programming Languages",
            SkillCategory::Frontend => "Frontend Technologies",
            SkillCategory::Backend => "Backend Technologies",
            SkillCategory::Databases => "Databases",
            SkillCategory::CloudDevops => "Cloud & DevOps",
        }
    }

    /// The checkbox labels offered for this category.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            SkillCategory::Languages => &[
                "Python", "JavaScript", "Java", "C++", "C#", "Ruby", "PHP", "Swift",
            ],
            SkillCategory::Frontend => &[
                "React", "Angular", "Vue.js", "Svelte", "HTML5", "CSS3", "SASS/SCSS", "Webpack",
            ],
            SkillCategory::Backend => &[
                "Node.js",
                "Django",
                "Flask",
                "Spring Boot",
                "Laravel",
                "Express.js",
                "FastAPI",
                "Ruby on Rails",
            ],
            SkillCategory::Databases => &[
                "PostgreSQL",
                "MySQL",
                "MongoDB",
                "Redis",
                "SQLite",
                "Oracle",
                "Microsoft SQL Server",
                "Cassandra",
            ],
            SkillCategory::CloudDevops => &[
                "AWS",
                "Azure",
                "Google Cloud",
                "Docker",
                "Kubernetes",
                "Jenkins",
                "Git",
                "GitHub Actions",
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogGroup {
    pub category: SkillCategory,
    pub title: &'static str,
    pub options: &'static [&'static str],
}

/// The full catalog, in display order.
pub fn skill_catalog() -> Vec<CatalogGroup> {
    SkillCategory::ALL
        .iter()
        .map(|&category| CatalogGroup {
            category,
            title: category.title(),
            options: category.options(),
        })
        .collect()
}

/// Checkbox selections per category plus the comma-separated "other" field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSelection {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub frontend: Vec<String>,
    #[serde(default)]
    pub backend: Vec<String>,
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub cloud_devops: Vec<String>,
    #[serde(default)]
    pub other: String,
}

impl SkillSelection {
    fn groups(&self) -> [(SkillCategory, &Vec<String>); 5] {
        [
            (SkillCategory::Languages, &self.languages),
            (SkillCategory::Frontend, &self.frontend),
            (SkillCategory::Backend, &self.backend),
            (SkillCategory::Databases, &self.databases),
            (SkillCategory::CloudDevops, &self.cloud_devops),
        ]
    }

    /// Checkbox labels that are not part of their category's catalog.
    pub fn unknown_labels(&self) -> Vec<String> {
        self.groups()
            .into_iter()
            .flat_map(|(category, labels)| {
                labels
                    .iter()
                    .filter(move |label| !category.options().contains(&label.as_str()))
                    .cloned()
            })
            .collect()
    }

    /// All checked labels in catalog order, then the "other" entries, de-duplicated.
    pub fn to_skill_set(&self) -> SkillSet {
        let checked = self
            .groups()
            .into_iter()
            .flat_map(|(_, labels)| labels.iter().map(String::as_str));
        let other = self.other.split(',');
        SkillSet::from_labels(checked.chain(other))
    }
}
