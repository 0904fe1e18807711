//! Profile record and lesson progress

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lessons of the course, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LessonId {
    #[serde(rename = "L1-1")]
    L1_1,
    #[serde(rename = "L1-2")]
    L1_2,
    #[serde(rename = "L1-3")]
    L1_3,
    #[serde(rename = "L2-1")]
    L2_1,
    #[serde(rename = "L2-2")]
    L2_2,
    #[serde(rename = "L2-3")]
    L2_3,
}

impl LessonId {
    pub const ALL: [LessonId; 6] = [
        LessonId::L1_1,
        LessonId::L1_2,
        LessonId::L1_3,
        LessonId::L2_1,
        LessonId::L2_2,
        LessonId::L2_3,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LessonId::L1_1 => "L1-1",
            LessonId::L1_2 => "L1-2",
            LessonId::L1_3 => "L1-3",
            LessonId::L2_1 => "L2-1",
            LessonId::L2_2 => "L2-2",
            LessonId::L2_3 => "L2-3",
        }
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LessonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LessonId::ALL
            .iter()
            .copied()
            .find(|lesson| lesson.code() == s)
            .ok_or_else(|| format!("unknown lesson '{}'", s))
    }
}

/// Completion flag per lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonProgress {
    completed: BTreeMap<LessonId, bool>,
}

impl Default for LessonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl LessonProgress {
    /// Every lesson present and not completed
    pub fn new() -> Self {
        Self {
            completed: LessonId::ALL.iter().map(|lesson| (*lesson, false)).collect(),
        }
    }

    pub fn is_completed(&self, lesson: LessonId) -> bool {
        self.completed.get(&lesson).copied().unwrap_or(false)
    }

    pub fn mark_completed(&mut self, lesson: LessonId) {
        self.completed.insert(lesson, true);
    }

    pub fn completed_count(&self) -> usize {
        self.completed.values().filter(|done| **done).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LessonId, bool)> + '_ {
        self.completed.iter().map(|(lesson, done)| (*lesson, *done))
    }
}

/// Stored per user. Holds no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub lessons: LessonProgress,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            lessons: LessonProgress::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_progress_is_all_false() {
        let progress = LessonProgress::new();
        assert_eq!(progress.iter().count(), 6);
        assert_eq!(progress.completed_count(), 0);
        assert!(LessonId::ALL.iter().all(|lesson| !progress.is_completed(*lesson)));
    }

    #[test]
    fn test_lesson_codes_round_trip() {
        for lesson in LessonId::ALL {
            assert_eq!(lesson.code().parse::<LessonId>().unwrap(), lesson);
        }
        assert!("L3-1".parse::<LessonId>().is_err());
    }

    #[test]
    fn test_profile_json_shape() {
        let mut profile = UserProfile::new("Ana", "ana@example.com");
        profile.lessons.mark_completed(LessonId::L1_2);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["name"], "Ana");
        assert_eq!(json["lessons"]["L1-1"], false);
        assert_eq!(json["lessons"]["L1-2"], true);
        assert_eq!(json.as_object().unwrap().len(), 3);

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
