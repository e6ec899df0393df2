//! Reading points, levels and badges
//!
//! [`Progress`] is the payload exchanged with `/api/gamification/progress`.
//! Points come from [`Action`]s, the level follows from the point total and
//! badges are granted once their [`Requirement`] is met by the reader's
//! [`ActivityStats`]. The widgets render through [`SecureDom`] like every
//! other view.

use std::time::Duration;

use lsw_dom::NodeId;
use serde::{Deserialize, Serialize};

use crate::{Attributes, RenderResult, SecureDom, ShownMessage};

pub const PROGRESS_ENDPOINT: &str = "/api/gamification/progress";

/// Pages the progress widgets are mounted on
pub const GAMIFICATION_PAGES: [&str; 3] = ["/dashboard.html", "/settings.html", "/story-player.html"];

const POINTS_TOAST_DURATION: Duration = Duration::from_millis(1100);
const BADGE_NOTICE_DURATION: Duration = Duration::from_secs(5);
const LEVEL_UP_DURATION: Duration = Duration::from_secs(8);

/// Stagger between consecutive badge notices
pub const BADGE_NOTICE_STAGGER: Duration = Duration::from_millis(500);

/// Whether the widgets belong on the page at `path`. The site root only
/// qualifies when it carries the progress container.
pub fn is_gamification_page(path: &str, has_progress_container: bool) -> bool {
    GAMIFICATION_PAGES.iter().any(|page| path.contains(page)) || (path == "/" && has_progress_container)
}

/// Something the reader did that earns points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StoryRead,
    QuizCompleted,
    PerfectQuiz,
    DailyStreak,
    WeeklyGoal,
}

impl Action {
    pub fn points(self) -> u32 {
        match self {
            Self::StoryRead => 10,
            Self::QuizCompleted => 15,
            Self::PerfectQuiz => 25,
            Self::DailyStreak => 5,
            Self::WeeklyGoal => 50,
        }
    }

    /// Points for a finished quiz
    pub fn quiz(perfect: bool) -> Self {
        if perfect { Self::PerfectQuiz } else { Self::QuizCompleted }
    }
}

/// Counters reported alongside story, quiz and streak events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityStats {
    pub total_stories_read: u32,
    pub perfect_quizzes: u32,
    pub stories_read_today: u32,
    pub current_streak: u32,
    pub is_early_reading: bool,
    pub is_late_reading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    StoriesRead(u32),
    PerfectQuizzes(u32),
    DailyStories(u32),
    ReadingStreak(u32),
    EarlyReading,
    LateReading,
}

impl Requirement {
    pub fn is_met(self, stats: &ActivityStats) -> bool {
        match self {
            Self::StoriesRead(n) => stats.total_stories_read >= n,
            Self::PerfectQuizzes(n) => stats.perfect_quizzes >= n,
            Self::DailyStories(n) => stats.stories_read_today >= n,
            Self::ReadingStreak(n) => stats.current_streak >= n,
            Self::EarlyReading => stats.is_early_reading,
            Self::LateReading => stats.is_late_reading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub requirement: Requirement,
}

pub const BADGES: &[Badge] = &[
    Badge {
        id: "first-story",
        name: "First Steps",
        description: "Read your first story",
        icon: "📖",
        color: "#10b981",
        requirement: Requirement::StoriesRead(1),
    },
    Badge {
        id: "bookworm",
        name: "Bookworm",
        description: "Read 10 stories",
        icon: "🐛",
        color: "#3b82f6",
        requirement: Requirement::StoriesRead(10),
    },
    Badge {
        id: "scholar",
        name: "Scholar",
        description: "Read 50 stories",
        icon: "🎓",
        color: "#8b5cf6",
        requirement: Requirement::StoriesRead(50),
    },
    Badge {
        id: "perfectionist",
        name: "Perfectionist",
        description: "Get 100% on 5 quizzes",
        icon: "💯",
        color: "#f59e0b",
        requirement: Requirement::PerfectQuizzes(5),
    },
    Badge {
        id: "speed-reader",
        name: "Speed Reader",
        description: "Read 5 stories in one day",
        icon: "⚡",
        color: "#ef4444",
        requirement: Requirement::DailyStories(5),
    },
    Badge {
        id: "streak-master",
        name: "Streak Master",
        description: "Read for 7 days in a row",
        icon: "🔥",
        color: "#f97316",
        requirement: Requirement::ReadingStreak(7),
    },
    Badge {
        id: "early-bird",
        name: "Early Bird",
        description: "Read before 9 AM",
        icon: "🌅",
        color: "#06b6d4",
        requirement: Requirement::EarlyReading,
    },
    Badge {
        id: "night-owl",
        name: "Night Owl",
        description: "Read after 9 PM",
        icon: "🦉",
        color: "#6366f1",
        requirement: Requirement::LateReading,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub level: u32,
    pub points_required: u32,
    pub title: &'static str,
    pub icon: &'static str,
}

/// Level table, ascending by `points_required`
pub const LEVELS: &[Level] = &[
    Level { level: 1, points_required: 0, title: "Beginner Reader", icon: "🌱" },
    Level { level: 2, points_required: 100, title: "Story Explorer", icon: "🗺️" },
    Level { level: 3, points_required: 250, title: "Book Adventurer", icon: "⛰️" },
    Level { level: 4, points_required: 500, title: "Reading Champion", icon: "🏆" },
    Level { level: 5, points_required: 1000, title: "Literature Master", icon: "👑" },
];

/// Highest level whose threshold `points` reaches
pub fn level_for(points: u32) -> &'static Level {
    LEVELS
        .iter()
        .rev()
        .find(|l| points >= l.points_required)
        .unwrap_or(&LEVELS[0])
}

pub fn next_level(level: &Level) -> Option<&'static Level> {
    LEVELS.iter().find(|l| l.level == level.level + 1)
}

fn default_level() -> u32 {
    1
}

/// Reader progress as stored by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub points: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Earned badge ids
    #[serde(default)]
    pub badges: Vec<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self { points: 0, level: default_level(), badges: Vec::new() }
    }
}

impl Progress {
    pub fn current_level(&self) -> &'static Level {
        level_for(self.points)
    }

    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }

    /// Add the points for `action`. Returns the new level on a level-up.
    pub fn award(&mut self, action: Action) -> Option<&'static Level> {
        self.award_points(action.points())
    }

    pub fn award_points(&mut self, points: u32) -> Option<&'static Level> {
        if points == 0 {
            return None;
        }
        self.points = self.points.saturating_add(points);

        let level = self.current_level();
        if level.level > self.level {
            tracing::info!(level = level.level, points = self.points, "level up");
            self.level = level.level;
            return Some(level);
        }
        None
    }

    /// Grant every badge `stats` now qualifies for and return the new ones
    pub fn check_badges(&mut self, stats: &ActivityStats) -> Vec<&'static Badge> {
        let earned: Vec<&'static Badge> = BADGES
            .iter()
            .filter(|badge| !self.has_badge(badge.id) && badge.requirement.is_met(stats))
            .collect();
        self.badges.extend(earned.iter().map(|b| b.id.to_string()));
        earned
    }

    /// Percent of the way from the current level to the next, capped at 100
    pub fn level_progress(&self) -> u32 {
        let current = self.current_level();
        match next_level(current) {
            Some(next) => {
                let span = next.points_required - current.points_required;
                ((self.points - current.points_required) * 100 / span).min(100)
            }
            None => 100,
        }
    }

    pub fn next_level_label(&self) -> String {
        match next_level(self.current_level()) {
            Some(next) => format!("{} points to {}", next.points_required.saturating_sub(self.points), next.title),
            None => "Max level reached!".to_string(),
        }
    }
}

impl SecureDom {
    /// Replace `container` with the level and points widget
    pub fn render_progress(&mut self, container: NodeId, progress: &Progress) -> RenderResult<()> {
        let level = progress.current_level();
        self.build(|dom| {
            let widget = dom.create_element("div", &Attributes::class("bg-slate-800 rounded-lg p-6 border border-slate-700"), None)?;

            let header = dom.create_element("div", &Attributes::class("flex items-center justify-between mb-4"), None)?;
            let info = dom.create_element("div", &Attributes::class("flex items-center space-x-2"), None)?;
            let icon = dom.create_element("span", &Attributes::class("text-2xl"), Some(level.icon))?;
            let text = dom.create_element("div", &Attributes::new(), None)?;
            let title = dom.create_element("h3", &Attributes::class("text-white font-bold"), Some(&format!("Level {}", level.level)))?;
            let name = dom.create_element("p", &Attributes::class("text-gray-400 text-sm"), Some(level.title))?;
            dom.append_content(text, [title, name])?;
            dom.append_content(info, [icon, text])?;

            let points = dom.create_element("div", &Attributes::class("text-right"), None)?;
            let total = dom.create_element(
                "div",
                &Attributes::class("text-2xl font-bold text-yellow-400"),
                Some(&progress.points.to_string()),
            )?;
            let label = dom.create_element("div", &Attributes::class("text-gray-400 text-sm"), Some("Points"))?;
            dom.append_content(points, [total, label])?;
            dom.append_content(header, [info, points])?;

            let bar = dom.create_element("div", &Attributes::class("w-full bg-slate-700 rounded-full h-3 mb-2"), None)?;
            let fill = dom.create_element(
                "div",
                &Attributes::class("bg-blue-500 h-3 rounded-full transition-all duration-500")
                    .style([("width", format!("{}%", progress.level_progress()))]),
                None,
            )?;
            dom.append_content(bar, [fill])?;
            let next = dom.create_element(
                "div",
                &Attributes::class("text-gray-400 text-sm text-center"),
                Some(&progress.next_level_label()),
            )?;

            dom.append_content(widget, [header, bar, next])?;
            dom.replace_content(container, [widget])
        })
    }

    /// Replace `container` with a grid holding one card per badge
    pub fn render_badges(&mut self, container: NodeId, progress: &Progress) -> RenderResult<()> {
        self.build(|dom| {
            let grid = dom.create_element("div", &Attributes::class("grid grid-cols-2 md:grid-cols-4 gap-4"), None)?;
            for badge in BADGES {
                let card = dom.badge_card(badge, progress.has_badge(badge.id))?;
                dom.append_content(grid, [card])?;
            }
            dom.replace_content(container, [grid])
        })
    }

    pub fn badge_card(&mut self, badge: &Badge, earned: bool) -> RenderResult<NodeId> {
        let (card_class, icon_class, name_class, text_class) = if earned {
            ("bg-slate-800 border-slate-600 shadow-lg", "text-4xl mb-2", "font-semibold text-white mb-1", "text-xs text-gray-300")
        } else {
            (
                "bg-slate-900 border-slate-700 opacity-50",
                "text-4xl mb-2 grayscale",
                "font-semibold text-white mb-1 text-gray-500",
                "text-xs text-gray-600",
            )
        };

        self.build(|dom| {
            let card = dom.create_element(
                "div",
                &Attributes::class(&format!("relative p-4 rounded-lg border-2 text-center transition-all duration-300 {card_class}"))
                    .data("badge-id", badge.id)?,
                None,
            )?;
            if earned {
                let check = dom.create_element(
                    "div",
                    &Attributes::class("absolute -top-2 -right-2 bg-green-500 text-white text-xs px-2 py-1 rounded-full"),
                    Some("✓"),
                )?;
                dom.append_content(card, [check])?;
            }
            let icon = dom.create_element("div", &Attributes::class(icon_class), Some(badge.icon))?;
            let name = dom.create_element("h4", &Attributes::class(name_class), Some(badge.name))?;
            let description = dom.create_element("p", &Attributes::class(text_class), Some(badge.description))?;
            dom.append_content(card, [icon, name, description])?;
            Ok(card)
        })
    }

    /// "+N points!" toast on the page body
    pub fn show_points_award(&mut self, points: u32) -> RenderResult<ShownMessage> {
        let body = self.document().body();
        self.build(|dom| {
            let node = dom.create_element(
                "div",
                &Attributes::class("fixed top-20 right-4 z-50 bg-yellow-500 text-black px-4 py-2 rounded-lg font-bold shadow-lg"),
                Some(&format!("+{points} points!")),
            )?;
            dom.append_content(body, [node])?;
            Ok(ShownMessage { node, auto_hide: Some(POINTS_TOAST_DURATION) })
        })
    }

    pub fn show_badge_notice(&mut self, badge: &Badge) -> RenderResult<ShownMessage> {
        let body = self.document().body();
        self.build(|dom| {
            let notice = dom.create_element(
                "div",
                &Attributes::class("fixed top-1/2 left-1/2 z-50 bg-slate-800 border-2 border-yellow-400 rounded-lg p-6 text-center shadow-2xl max-w-sm")
                    .data("badge-id", badge.id)?,
                None,
            )?;
            let title = dom.create_element("h3", &Attributes::class("text-yellow-400 font-bold text-xl mb-2"), Some("Badge Earned!"))?;
            let icon = dom.create_element("div", &Attributes::class("text-6xl mb-4"), Some(badge.icon))?;
            let name = dom.create_element("h4", &Attributes::class("text-white font-semibold text-lg mb-2"), Some(badge.name))?;
            let description = dom.create_element("p", &Attributes::class("text-gray-300"), Some(badge.description))?;
            let close = dom.create_element(
                "button",
                &Attributes::class("mt-4 bg-yellow-400 text-black px-4 py-2 rounded font-semibold").data("action", "close-notice")?,
                Some("Awesome!"),
            )?;
            dom.append_content(notice, [title, icon, name, description, close])?;
            dom.append_content(body, [notice])?;
            Ok(ShownMessage { node: notice, auto_hide: Some(BADGE_NOTICE_DURATION) })
        })
    }

    pub fn show_level_up(&mut self, level: &Level) -> RenderResult<ShownMessage> {
        let body = self.document().body();
        self.build(|dom| {
            let notice = dom.create_element(
                "div",
                &Attributes::class("fixed top-1/2 left-1/2 z-50 bg-gradient-to-r from-purple-600 to-blue-600 rounded-lg p-8 text-center shadow-2xl max-w-md border-2 border-white"),
                None,
            )?;
            let title = dom.create_element("h3", &Attributes::class("text-white font-bold text-2xl mb-4"), Some("LEVEL UP!"))?;
            let icon = dom.create_element("div", &Attributes::class("text-8xl mb-4"), Some(level.icon))?;
            let info = dom.create_element("div", &Attributes::class("text-white mb-4"), None)?;
            let number = dom.create_element("div", &Attributes::class("text-4xl font-bold"), Some(&format!("Level {}", level.level)))?;
            let name = dom.create_element("div", &Attributes::class("text-xl"), Some(level.title))?;
            dom.append_content(info, [number, name])?;
            let close = dom.create_element(
                "button",
                &Attributes::class("mt-4 bg-white text-purple-600 px-6 py-3 rounded-full font-bold").data("action", "close-notice")?,
                Some("Continue Reading!"),
            )?;
            dom.append_content(notice, [title, icon, info, close])?;
            dom.append_content(body, [notice])?;
            Ok(ShownMessage { node: notice, auto_hide: Some(LEVEL_UP_DURATION) })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (SecureDom, NodeId) {
        let mut dom = SecureDom::default();
        let body = dom.document().body();
        let container = dom.create_element("div", &Attributes::new().id("gamification-progress"), None).unwrap();
        dom.append_content(body, [container]).unwrap();
        (dom, container)
    }

    #[test]
    fn test_points_per_action() {
        assert_eq!(Action::StoryRead.points(), 10);
        assert_eq!(Action::quiz(false).points(), 15);
        assert_eq!(Action::quiz(true).points(), 25);
        assert_eq!(Action::DailyStreak.points(), 5);
        assert_eq!(Action::WeeklyGoal.points(), 50);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0).level, 1);
        assert_eq!(level_for(99).level, 1);
        assert_eq!(level_for(100).level, 2);
        assert_eq!(level_for(499).level, 3);
        assert_eq!(level_for(5000).level, 5);
        assert_eq!(next_level(level_for(5000)), None);
    }

    #[test]
    fn test_award_reports_level_up_once() {
        let mut progress = Progress { points: 90, ..Progress::default() };
        let up = progress.award(Action::StoryRead);
        assert_eq!(up.map(|l| l.title), Some("Story Explorer"));
        assert_eq!(progress.level, 2);
        assert_eq!(progress.award(Action::StoryRead), None);
        assert_eq!(progress.points, 110);
        assert_eq!(progress.award_points(0), None);
    }

    #[test]
    fn test_badges_granted_once() {
        let mut progress = Progress::default();
        let stats = ActivityStats { total_stories_read: 10, is_late_reading: true, ..Default::default() };

        let ids: Vec<_> = progress.check_badges(&stats).iter().map(|b| b.id).collect();
        assert_eq!(ids, ["first-story", "bookworm", "night-owl"]);
        assert!(progress.check_badges(&stats).is_empty());
        assert!(!progress.has_badge("scholar"));
    }

    #[test]
    fn test_requirements() {
        let stats = ActivityStats {
            perfect_quizzes: 5,
            stories_read_today: 4,
            current_streak: 7,
            ..Default::default()
        };
        assert!(Requirement::PerfectQuizzes(5).is_met(&stats));
        assert!(!Requirement::DailyStories(5).is_met(&stats));
        assert!(Requirement::ReadingStreak(7).is_met(&stats));
        assert!(!Requirement::EarlyReading.is_met(&stats));
    }

    #[test]
    fn test_payload_defaults() {
        let progress: Progress = serde_json::from_str("{}").unwrap();
        assert_eq!(progress, Progress::default());
        assert_eq!(progress.level, 1);

        let stats: ActivityStats = serde_json::from_str(r#"{"totalStoriesRead": 3, "isEarlyReading": true}"#).unwrap();
        assert_eq!(stats.total_stories_read, 3);
        assert!(stats.is_early_reading);
    }

    #[test]
    fn test_level_progress() {
        let mut progress = Progress { points: 175, ..Progress::default() };
        assert_eq!(progress.level_progress(), 50);
        assert_eq!(progress.next_level_label(), "75 points to Book Adventurer");

        progress.points = 1200;
        assert_eq!(progress.level_progress(), 100);
        assert_eq!(progress.next_level_label(), "Max level reached!");
    }

    #[test]
    fn test_render_progress() {
        let (mut dom, c) = page();
        dom.render_progress(c, &Progress { points: 175, level: 2, badges: vec![] }).unwrap();

        let text = dom.text_content(c);
        assert!(text.contains("Level 2"));
        assert!(text.contains("Story Explorer"));
        assert!(text.contains("175"));
        assert!(text.contains("75 points to Book Adventurer"));
        assert!(dom.inner_html(c).contains("width: 50%;"));
    }

    #[test]
    fn test_render_badges() {
        let (mut dom, c) = page();
        let progress = Progress { badges: vec!["bookworm".into()], ..Progress::default() };
        dom.render_badges(c, &progress).unwrap();

        let grid = dom.children(c)[0];
        let cards = dom.children(grid);
        assert_eq!(cards.len(), BADGES.len());

        let earned = cards[1];
        assert_eq!(dom.element(earned).unwrap().attribute("data-badge-id").as_deref(), Some("bookworm"));
        assert_eq!(dom.children(earned).len(), 4);
        assert!(dom.element(earned).unwrap().classes.contains("shadow-lg"));

        let locked = cards[0];
        assert_eq!(dom.children(locked).len(), 3);
        assert!(dom.element(locked).unwrap().classes.contains("opacity-50"));
    }

    #[test]
    fn test_notices_land_on_body() {
        let (mut dom, _) = page();
        let body = dom.document().body();

        let toast = dom.show_points_award(25).unwrap();
        assert_eq!(dom.text_content(toast.node), "+25 points!");
        assert_eq!(toast.auto_hide, Some(Duration::from_millis(1100)));

        let notice = dom.show_badge_notice(&BADGES[0]).unwrap();
        assert!(dom.is_child(body, notice.node));
        assert_eq!(notice.auto_hide, Some(Duration::from_secs(5)));

        let up = dom.show_level_up(level_for(250)).unwrap();
        assert!(dom.text_content(up.node).contains("Book Adventurer"));
        assert_eq!(up.auto_hide, Some(Duration::from_secs(8)));
    }

    #[test]
    fn test_failed_render_leaves_arena_unchanged() {
        let (mut dom, c) = page();
        dom.remove(c).unwrap();
        let before = dom.tree().len();
        assert!(dom.render_badges(c, &Progress::default()).is_err());
        assert!(dom.render_progress(c, &Progress::default()).is_err());
        assert_eq!(dom.tree().len(), before);
    }

    #[test]
    fn test_page_gating() {
        assert!(is_gamification_page("/dashboard.html", false));
        assert!(is_gamification_page("/app/story-player.html", false));
        assert!(is_gamification_page("/", true));
        assert!(!is_gamification_page("/", false));
        assert!(!is_gamification_page("/admin.html", true));
    }
}
