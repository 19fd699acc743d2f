/// Shown after a correct answer.
pub const MOTIVATION_LINES: [&str; 5] = [
    "🔥 That’s how pros think!",
    "🚀 Clean hit! Keep it up!",
    "💡 Sharp answer!",
    "🎯 On target!",
    "🏆 Textbook perfect!",
];

/// Shown after a wrong answer; the question is already back in the queue.
pub const ENCOURAGEMENT_LINES: [&str; 3] = [
    "No stress, we’ll revisit this soon.",
    "Good attempt. The pattern will click.",
    "We’ll slot this back in the queue.",
];
