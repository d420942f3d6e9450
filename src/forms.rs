#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Appointment,
    Questionnaire,
}

impl FormKind {
    pub fn name(self) -> &'static str {
        match self {
            FormKind::Appointment => "appointment",
            FormKind::Questionnaire => "questionnaire",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    Choice(&'static [ChoiceOption]),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    fn text(key: &'static str, label: impl Into<String>, required: bool) -> Self {
        Self {
            key,
            label: label.into(),
            required,
            kind: FieldKind::Text,
            value: String::new(),
        }
    }

    fn choice(
        key: &'static str,
        label: impl Into<String>,
        required: bool,
        options: &'static [ChoiceOption],
    ) -> Self {
        Self {
            key,
            label: label.into(),
            required,
            kind: FieldKind::Choice(options),
            value: String::new(),
        }
    }

    /// Human-readable form of the current value (choice values map back to
    /// their option labels).
    pub fn display_value(&self) -> &str {
        match self.kind {
            FieldKind::Text => &self.value,
            FieldKind::Choice(options) => options
                .iter()
                .find(|o| o.value == self.value)
                .map(|o| o.label)
                .unwrap_or(""),
        }
    }
}

/// Flat key/value snapshot of a submitted form, in field order.
pub type FormRecord = Vec<(&'static str, String)>;

pub fn record_value<'a>(record: &'a FormRecord, key: &str) -> &'a str {
    record
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

pub const APPOINTMENT_TIMES: [ChoiceOption; 6] = [
    ChoiceOption { value: "09:00", label: "9:00 AM" },
    ChoiceOption { value: "10:00", label: "10:00 AM" },
    ChoiceOption { value: "11:00", label: "11:00 AM" },
    ChoiceOption { value: "14:00", label: "2:00 PM" },
    ChoiceOption { value: "15:00", label: "3:00 PM" },
    ChoiceOption { value: "16:00", label: "4:00 PM" },
];

pub const LIKERT_SCALE: [ChoiceOption; 4] = [
    ChoiceOption { value: "not-at-all", label: "Not at all" },
    ChoiceOption { value: "several-days", label: "Several days" },
    ChoiceOption { value: "more-than-half", label: "More than half the days" },
    ChoiceOption { value: "nearly-every-day", label: "Nearly every day" },
];

const YES_NO: [ChoiceOption; 2] = [
    ChoiceOption { value: "yes", label: "Yes" },
    ChoiceOption { value: "no", label: "No" },
];

const MEDICATION_COUNTS: [ChoiceOption; 5] = [
    ChoiceOption { value: "0", label: "0" },
    ChoiceOption { value: "1", label: "1" },
    ChoiceOption { value: "2-4", label: "2-4" },
    ChoiceOption { value: "5+", label: "5+" },
    ChoiceOption { value: "not-sure", label: "Not Sure" },
];

pub const HEALTH_QUESTIONS_PROMPT: &str =
    "Over the last two weeks, how often have you been bothered by any of the following problems?";

const HEALTH_QUESTIONS: [(&'static str, &'static str); 9] = [
    ("question1", "Little interest or pleasure in doing things"),
    ("question2", "Feeling down, depressed, or hopeless"),
    ("question3", "Trouble falling or staying asleep, or sleeping too much"),
    ("question4", "Feeling tired or having little energy"),
    ("question5", "Poor appetite or overeating"),
    ("question6", "Feeling bad about yourself – or that you are a failure or have let yourself or your family down"),
    ("question7", "Trouble concentrating on things, such as reading the newspaper or watching television"),
    ("question8", "Moving or speaking so slowly that other people could notice. Or the opposite – being so fidgety or restless that you have been moving around a lot more than usual"),
    ("question9", "Thoughts that you would be better off dead, or of hurting yourself"),
];

/// Modal intake form: ordered fields, one focused at a time, required-field
/// validation on submit. Answers pass through unmodified; no scoring.
pub struct IntakeForm {
    pub kind: FormKind,
    pub title: &'static str,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

impl IntakeForm {
    pub fn appointment() -> Self {
        Self {
            kind: FormKind::Appointment,
            title: "Schedule Appointment",
            fields: vec![
                Field::text("firstName", "First Name", true),
                Field::text("lastName", "Last Name", true),
                Field::text("email", "Email", true),
                Field::text("phone", "Phone Number", true),
                Field::text("appointmentDate", "Preferred Date (YYYY-MM-DD)", true),
                Field::choice("appointmentTime", "Preferred Time", true, &APPOINTMENT_TIMES),
                Field::text("reason", "Reason for Visit", false),
            ],
            focus: 0,
            error: None,
        }
    }

    pub fn questionnaire() -> Self {
        let mut fields = vec![
            Field::text("firstName", "First Name", true),
            Field::text("lastName", "Last Name", true),
            Field::text("dateOfBirth", "Date of Birth (YYYY-MM-DD)", true),
            Field::text("phone", "Phone Number", true),
            Field::text("email", "Email", true),
            Field::text("address", "Address", false),
            Field::text("aptSuite", "Apt/Suite", false),
            Field::text("city", "City", false),
            Field::text("state", "State", false),
            Field::text("zipCode", "Zip Code", false),
        ];
        for (i, (key, question)) in HEALTH_QUESTIONS.into_iter().enumerate() {
            fields.push(Field::choice(
                key,
                format!("{}. {}", i + 1, question),
                false,
                &LIKERT_SCALE,
            ));
        }
        fields.push(Field::choice(
            "treatmentInterest",
            "Would you be interested in learning more about a safe, effective, non-drug treatment for depression?",
            false,
            &YES_NO,
        ));
        fields.push(Field::choice(
            "medicationHistory",
            "How many anti-depressant prescription medications do you currently take or have tried in the past?",
            false,
            &MEDICATION_COUNTS,
        ));

        Self {
            kind: FormKind::Questionnaire,
            title: "Patient Health Questionnaire",
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> &Field {
        &self.fields[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
        self.error = None;
    }

    pub fn focus_prev(&mut self) {
        self.focus = if self.focus == 0 {
            self.fields.len() - 1
        } else {
            self.focus - 1
        };
        self.error = None;
    }

    pub fn insert_char(&mut self, c: char) {
        let field = &mut self.fields[self.focus];
        if let FieldKind::Text = field.kind {
            field.value.push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        let field = &mut self.fields[self.focus];
        if let FieldKind::Text = field.kind {
            field.value.pop();
        }
    }

    pub fn choice_next(&mut self) {
        let field = &mut self.fields[self.focus];
        if let FieldKind::Choice(options) = field.kind {
            let next = match options.iter().position(|o| o.value == field.value) {
                Some(i) => (i + 1) % options.len(),
                None => 0,
            };
            field.value = options[next].value.to_string();
            self.error = None;
        }
    }

    pub fn choice_prev(&mut self) {
        let field = &mut self.fields[self.focus];
        if let FieldKind::Choice(options) = field.kind {
            let prev = match options.iter().position(|o| o.value == field.value) {
                Some(0) | None => options.len() - 1,
                Some(i) => i - 1,
            };
            field.value = options[prev].value.to_string();
            self.error = None;
        }
    }

    /// Check required fields. On the first gap, focus the offending field,
    /// set the error line and return false; submission must not proceed.
    pub fn validate(&mut self) -> bool {
        if let Some(i) = self
            .fields
            .iter()
            .position(|f| f.required && f.value.trim().is_empty())
        {
            self.error = Some(format!("{} is required", self.fields[i].label));
            self.focus = i;
            return false;
        }
        self.error = None;
        true
    }

    /// Snapshot every field as a flat key/value record, including fields
    /// that were left blank.
    pub fn record(&self) -> FormRecord {
        self.fields
            .iter()
            .map(|f| (f.key, f.value.clone()))
            .collect()
    }
}
