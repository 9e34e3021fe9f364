use crate::quiz::{DefinitionError, QuizDefinition, QuizStep, StepPrompt};

/// One inline button of the follow-up invite. The token travels as the
/// callback payload and must stay stable across deployments.
#[derive(Debug, Clone)]
pub struct InviteSlot {
    pub label: String,
    pub token: String,
}

/// Everything content-shaped for one deployment: quiz copy, onboarding
/// texts, asset file names, follow-up invite. The state machine never
/// looks inside any of this beyond the quiz table.
#[derive(Debug, Clone)]
pub struct BotContent {
    pub quiz: QuizDefinition,
    pub welcome_caption: String,
    pub about_text: String,
    pub invite_text: String,
    pub invite_slots: Vec<InviteSlot>,
    pub ticket_caption: String,
    pub ticket_toast: String,
    pub checklist_caption: String,
    pub welcome_photo: String,
    pub welcome_voice: String,
    pub checklist_document: String,
    pub ticket_photo: String,
    result_header: String,
    result_footer: String,
}

impl BotContent {
    /// The money-audit funnel shipped by default.
    pub fn default_funnel() -> Result<Self, DefinitionError> {
        let quiz = QuizDefinition::new(vec![
            StepPrompt::new(
                QuizStep::Role,
                "<b>🎯 Where does your money leak — without you noticing?</b>\n\n\
                 Most people are sure they control their finances. The numbers say \
                 otherwise: 7 out of 10 overspend their plan, and 8 out of 10 have \
                 no real reserve.\n\n\
                 Nine quick questions will show where your money underperforms.\n\n\
                 <i><u>📥 Starting right now:</u></i>\n\nHow would you describe your role?",
                &["Entrepreneur", "Manager", "Specialist", "Other"],
            ),
            StepPrompt::new(
                QuizStep::Experience,
                "How much investing experience do you have?",
                &["Just starting", "1–3 years", "3+ years"],
            ),
            StepPrompt::new(
                QuizStep::Capital,
                "How much free capital are you ready to manage?",
                &["Under $10k", "$10–50k", "$50k+"],
            ),
            StepPrompt::new(
                QuizStep::IncomeSources,
                "How many income sources do you have?",
                &["1", "2–3", "4+"],
            ),
            StepPrompt::new(
                QuizStep::SpareMoney,
                "Money left over at the end of the month usually…",
                &["Gets invested", "Sits idle", "Evaporates"],
            ),
            StepPrompt::new(
                QuizStep::ExpenseTracking,
                "Do you track your expenses?",
                &["Yes, regularly", "Sometimes", "No"],
            ),
            StepPrompt::new(
                QuizStep::BudgetLeak,
                "What eats your budget the most?",
                &["Loans", "Impulse purchases", "Business costs"],
            ),
            StepPrompt::new(
                QuizStep::Reserve,
                "Your reserve would cover…",
                &["Under 3 months", "3–5 months", "6+ months"],
            ),
            StepPrompt::new(
                QuizStep::Goal,
                "Main goal for the year?",
                &["Grow income", "Cut debt", "Build a reserve"],
            ),
        ])?;

        Ok(Self {
            quiz,
            welcome_caption: "<b>Welcome to the Advisor Club!</b>\n\n\
                You've landed in a place where money stops being a source of \
                stress and becomes a tool — for work, travel and new options.\n\n\
                <i><u>The club is:</u></i>\n\n\
                ⚡️ Advisors who teach you to see your numbers, not guess them\n\
                ⚡️ Real cases instead of textbook theory\n\
                ⚡️ A community where asking questions is the whole point"
                .to_owned(),
            about_text: "<b>We believe a budget is not a spreadsheet</b> — it's a \
                habit. Here you'll find a space that adapts to your pace: no \
                pressure, no race, just steady progress. <b>Welcome!</b>"
                .to_owned(),
            invite_text: "<b>🎟 We've set aside a gift e-ticket for you — claim it \
                while a seat is free</b>\n\n\
                You already know where your capital underperforms. The next step \
                is to sit down with people solving the same problems.\n\n\
                <i><u>Your personal e-ticket to an Advisor Club meetup:</u></i>\n\n\
                <b>1. Grow +Income</b> — where to find quiet 6–8% a year\n\
                <b>2. Cut –Losses</b> — fees, dead subscriptions, idle assets\n\
                <b>3. Build =Stability</b> — a \"6 × 6\" reserve, step by step\n\n\
                When works for you?"
                .to_owned(),
            invite_slots: vec![
                InviteSlot {
                    label: "Tuesday — claim a ticket".to_owned(),
                    token: "ticket_Tue".to_owned(),
                },
                InviteSlot {
                    label: "Thursday — claim a ticket".to_owned(),
                    token: "ticket_Thu".to_owned(),
                },
            ],
            ticket_caption: "<b>💙 Your personal session is booked!</b>\n\n\
                You're officially in for a free mini-session with an Advisor Club \
                mentor. Not a sales pitch for everyone — a conversation about you \
                and your numbers.\n\n\
                📍 <b>Format:</b> online (Zoom / Telegram)\n\
                🕖 <b>Starts</b> at the time you picked.\n\n\
                A reminder with the join link arrives on the day. See you!✨"
                .to_owned(),
            ticket_toast: "Ticket sent 👆".to_owned(),
            checklist_caption: "Your checklist (PDF)".to_owned(),
            welcome_photo: "welcome.jpg".to_owned(),
            welcome_voice: "welcome.ogg".to_owned(),
            checklist_document: "checklist.pdf".to_owned(),
            ticket_photo: "ticket.png".to_owned(),
            result_header: "<b>✅ Here's your result</b>\n\n\
                Your answers make one thing clear: the question is not whether you \
                can manage money, but how to make the system work for you instead \
                of the other way around.\n\n\
                We've prepared a printable \"365 words of money\" calendar: the \
                whole year on one page. One habit a day, one check mark — simple \
                mechanics that turn finance from \"should do\" into daily motion."
                .to_owned(),
            result_footer: "<b>Open the checklist, mark day one — and off we go. 🚀</b>"
                .to_owned(),
        })
    }

    /// Builds the completion message from the recorded answers.
    pub fn result_message(&self, answers: &[(QuizStep, String)]) -> String {
        let mut out = self.result_header.clone();
        if let Some((_, goal)) = answers.iter().find(|(s, _)| *s == QuizStep::Goal) {
            out.push_str(&format!(
                "\n\nYou named a clear goal — <i>{goal}</i> — and that is exactly \
                 where the calendar starts."
            ));
        }
        out.push_str("\n\n");
        out.push_str(&self.result_footer);
        out
    }

    pub fn is_invite_token(&self, token: &str) -> bool {
        self.invite_slots.iter().any(|slot| slot.token == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_funnel_builds_a_full_definition() {
        let content = BotContent::default_funnel().unwrap();
        assert_eq!(content.quiz.len(), QuizStep::QUESTIONS.len());
        assert_eq!(content.quiz.first(), QuizStep::Role);
        for step in content.quiz.steps() {
            assert!(!step.options.is_empty());
        }
        assert_eq!(content.invite_slots.len(), 2);
    }

    #[test]
    fn result_message_mentions_the_goal_answer() {
        let content = BotContent::default_funnel().unwrap();
        let answers = vec![
            (QuizStep::Role, "Entrepreneur".to_owned()),
            (QuizStep::Goal, "Cut debt".to_owned()),
        ];
        let msg = content.result_message(&answers);
        assert!(msg.contains("Cut debt"));

        let without_goal = content.result_message(&[]);
        assert!(!without_goal.is_empty());
    }

    #[test]
    fn invite_tokens_round_trip() {
        let content = BotContent::default_funnel().unwrap();
        assert!(content.is_invite_token("ticket_Tue"));
        assert!(content.is_invite_token("ticket_Thu"));
        assert!(!content.is_invite_token("ticket_Mon"));
    }
}
