//! Static portfolio content shown on the dashboard and education tabs.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    #[serde(rename = "desc")]
    pub description: &'static str,
    pub tags: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct Education {
    pub id: &'static str,
    pub degree: &'static str,
    pub institution: &'static str,
    pub score: &'static str,
    pub passout: &'static str,
    pub details: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<&'static str>,
}

pub const OWNER_NAME: &str = "Alex";

/// Offered in the empty chat panel
pub static SUGGESTED_QUESTIONS: &[&str] = &[
    "Tell me my 10th grade percentage",
    "How many React Native projects are there?",
    "What was my CGPA in BE?",
    "Show me the MERN stack projects",
];

pub static PROJECTS: &[Project] = &[
    Project {
        id: "proj-aiml-1",
        category: "AIML",
        title: "Neural Vision Engine",
        description: "Real-time object detection using TensorFlow.js and custom CNN models.",
        tags: &["Python", "TensorFlow", "React"],
    },
    Project {
        id: "proj-aiml-2",
        category: "AIML",
        title: "NLP Sentiment Bot",
        description: "Analyzes massive social media feeds to predict market trends with BERT.",
        tags: &["BERT", "FastAPI", "Node.js"],
    },
    Project {
        id: "proj-mern-1",
        category: "MERN",
        title: "Eco-Marketplace",
        description: "Full-stack e-commerce with Stripe integration and redundant DB architecture.",
        tags: &["MongoDB", "Express", "React", "Node"],
    },
    Project {
        id: "proj-mern-2",
        category: "MERN",
        title: "DevFlow Social",
        description: "A social network for developers with real-time code sharing and chat.",
        tags: &["Socket.io", "Redux", "Mongoose"],
    },
    Project {
        id: "proj-rn-1",
        category: "React Native",
        title: "FitTrack Pro",
        description: "Cross-platform health tracking app with Apple Health & Google Fit sync.",
        tags: &["Expo", "Redux", "Firebase"],
    },
    Project {
        id: "proj-rn-2",
        category: "React Native",
        title: "GeoSafe",
        description: "Family location sharing app with geofencing and emergency alerts.",
        tags: &["Maps SDK", "Node.js", "Native Modules"],
    },
];

pub static EDUCATION: &[Education] = &[
    Education {
        id: "edu-be",
        degree: "BE - Computer Science",
        institution: "University of Engineering",
        score: "CGPA: 9.02",
        passout: "2024",
        details: "Specialized in Artificial Intelligence and Cloud Computing.",
        board: None,
    },
    Education {
        id: "edu-12th",
        degree: "12th (Higher Secondary)",
        institution: "DNC College of Arts, Commerce and Science",
        score: "Percentage: 75%",
        passout: "2018",
        details: "Science stream with focus on Information Technology.",
        board: Some("Maharashtra State Board"),
    },
    Education {
        id: "edu-10th",
        degree: "10th (Secondary School)",
        institution: "Godavari English Medium CBSE School, Jalgaon, Maharashtra",
        score: "Percentage: 79%",
        passout: "2018",
        details: "All-round performance with distinction in Mathematics.",
        board: Some("CBSE"),
    },
];
