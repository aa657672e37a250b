//! Built-in practice question bank

use crate::interview::models::{Difficulty, InterviewQuestion};

struct Seed {
    id: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    text: &'static str,
    tips: &'static [&'static str],
}

const BANK: &[Seed] = &[
    Seed {
        id: "teamwork-1",
        category: "teamwork",
        difficulty: Difficulty::Medium,
        text: "Tell me about a time you had to work with a difficult team member. How did you handle it?",
        tips: &[
            "Focus on your actions, not blame",
            "Show empathy and problem-solving",
            "Highlight the outcome",
        ],
    },
    Seed {
        id: "teamwork-2",
        category: "teamwork",
        difficulty: Difficulty::Easy,
        text: "Describe a successful team project you contributed to. What was your role?",
        tips: &[
            "Quantify your contribution",
            "Mention specific responsibilities",
        ],
    },
    Seed {
        id: "teamwork-3",
        category: "teamwork",
        difficulty: Difficulty::Medium,
        text: "How do you handle disagreements with team members about technical decisions?",
        tips: &["Show you value other opinions", "Explain how you reached a decision"],
    },
    Seed {
        id: "leadership-1",
        category: "leadership",
        difficulty: Difficulty::Medium,
        text: "Tell me about a time you took initiative without being asked.",
        tips: &["Show self-motivation", "Highlight business impact"],
    },
    Seed {
        id: "leadership-2",
        category: "leadership",
        difficulty: Difficulty::Hard,
        text: "Describe a situation where you had to lead a team through a challenging project.",
        tips: &[
            "Describe your leadership style",
            "Address the challenges you faced",
            "Highlight how the team grew",
        ],
    },
    Seed {
        id: "leadership-3",
        category: "leadership",
        difficulty: Difficulty::Medium,
        text: "How do you motivate team members who are struggling?",
        tips: &["Show empathy first", "Provide concrete support"],
    },
    Seed {
        id: "problem-solving-1",
        category: "problem_solving",
        difficulty: Difficulty::Hard,
        text: "Describe a complex problem you solved at work. What was your approach?",
        tips: &["Walk through your method", "Quantify the improvement"],
    },
    Seed {
        id: "problem-solving-2",
        category: "problem_solving",
        difficulty: Difficulty::Hard,
        text: "Tell me about a time you had to make a decision with incomplete information.",
        tips: &["Explain how you assessed risk", "Mention your fallback plan"],
    },
    Seed {
        id: "achievement-1",
        category: "achievement",
        difficulty: Difficulty::Easy,
        text: "What is your proudest professional achievement?",
        tips: &["Pick something with clear impact", "Include metrics"],
    },
    Seed {
        id: "achievement-2",
        category: "achievement",
        difficulty: Difficulty::Medium,
        text: "Describe a time you exceeded expectations on a project.",
        tips: &["Show initiative beyond requirements", "Mention recognition received"],
    },
    Seed {
        id: "failure-1",
        category: "failure",
        difficulty: Difficulty::Hard,
        text: "Tell me about a time you failed. What did you learn?",
        tips: &["Be honest about the failure", "Focus on lessons learned"],
    },
    Seed {
        id: "failure-2",
        category: "failure",
        difficulty: Difficulty::Medium,
        text: "Describe a project that didn't go as planned. How did you handle it?",
        tips: &["Show transparency", "Share what you changed afterwards"],
    },
    Seed {
        id: "system-design-1",
        category: "system_design",
        difficulty: Difficulty::Medium,
        text: "How would you design a URL shortening service?",
        tips: &["Start with requirements", "Discuss trade-offs", "Consider scale"],
    },
    Seed {
        id: "system-design-2",
        category: "system_design",
        difficulty: Difficulty::Hard,
        text: "Design the architecture of a real-time chat application.",
        tips: &["Address delivery guarantees", "Plan for offline clients"],
    },
    Seed {
        id: "communication-1",
        category: "communication",
        difficulty: Difficulty::Easy,
        text: "How would you explain a technical concept to a non-technical stakeholder?",
        tips: &["Use an analogy", "Check for understanding"],
    },
    Seed {
        id: "communication-2",
        category: "communication",
        difficulty: Difficulty::Medium,
        text: "Tell me about a presentation you gave that changed a decision.",
        tips: &["Describe your audience", "Explain what convinced them"],
    },
];

impl Seed {
    fn to_question(&self) -> InterviewQuestion {
        InterviewQuestion {
            id: self.id.to_string(),
            text: self.text.to_string(),
            category: self.category.to_string(),
            difficulty: self.difficulty,
            tips: self.tips.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// All questions in bank order
pub fn all_questions() -> Vec<InterviewQuestion> {
    BANK.iter().map(Seed::to_question).collect()
}

pub fn question_by_id(id: &str) -> Option<InterviewQuestion> {
    BANK.iter().find(|s| s.id == id).map(Seed::to_question)
}

/// First unasked question of `difficulty`, else any unasked question.
pub fn next_question(difficulty: Difficulty, asked: &[String]) -> Option<InterviewQuestion> {
    let unasked = || BANK.iter().filter(|s| !asked.iter().any(|id| id == s.id));

    unasked()
        .find(|s| s.difficulty == difficulty)
        .or_else(|| unasked().next())
        .map(Seed::to_question)
}
