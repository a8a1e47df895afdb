/// Defines the closed set of message keys and generates:
/// - the `MessageKey` enum (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)
/// - `MessageKey::ALL`, every key in declaration order
/// - `as_str()`, the dotted catalog path
/// - `Display` and `FromStr` over the dotted path
///
/// Usage:
///   define_message_keys! { AppTitle => "app.title", ... }
macro_rules! define_message_keys {
    ($($variant:ident => $path:literal),+ $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum MessageKey {
            $($variant),+
        }

        impl MessageKey {
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $path),+
                }
            }
        }

        impl ::std::fmt::Display for MessageKey {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for MessageKey {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($path => Ok(MessageKey::$variant),)+
                    other => Err(format!("Unknown message key: {}", other)),
                }
            }
        }
    };
}

define_message_keys! {
    AppTitle => "app.title",

    NavWelcome => "nav.welcome",
    NavSingle => "nav.single",
    NavCouple => "nav.couple",
    NavFeedback => "nav.feedback",

    SidebarTitle => "sidebar.title",
    SidebarNav => "sidebar.nav",
    SidebarLanguage => "sidebar.language",

    WelcomeTitle => "welcome.title",
    WelcomeDescription => "welcome.description",
    WelcomeSingleButton => "welcome.single_button",
    WelcomeCoupleButton => "welcome.couple_button",

    PremiumSubscription => "premium.subscription",

    SingleTitle => "single.title",
    SingleName => "single.name",
    SingleDob => "single.dob",
    SingleTime => "single.time",
    SingleGender => "single.gender",
    SingleMale => "single.male",
    SingleFemale => "single.female",
    SingleCountry => "single.country",
    SingleSubmit => "single.submit",
    SingleCalculating => "single.calculating",
    SingleSajuResult => "single.saju_result",
    SingleNumerologyResult => "single.numerology_result",
    SingleZodiacResult => "single.zodiac_result",
    SingleBaziResult => "single.bazi_result",
    SinglePremium => "single.premium",
    SinglePremiumPrompt => "single.premium_prompt",

    CoupleTitle => "couple.title",
    CouplePerson1 => "couple.person1",
    CouplePerson2 => "couple.person2",
    CoupleSubmit => "couple.submit",
    CoupleCalculating => "couple.calculating",
    CoupleCompatibility => "couple.compatibility",
    CoupleBreakdown => "couple.breakdown",
    CoupleSameGender => "couple.same_gender",
    CouplePremium => "couple.premium",
    CouplePremiumPrompt => "couple.premium_prompt",

    DataSaved => "data_saved",
    DataSaveError => "data_save_error",

    FeedbackTitle => "feedback.title",
    FeedbackPrompt => "feedback.prompt",
    FeedbackSubmit => "feedback.submit",
    FeedbackSuccess => "feedback.success",
    FeedbackError => "feedback.error",

    ChatbotTitle => "chatbot.title",
    ChatbotPrompt => "chatbot.prompt",
    ChatbotResponse => "chatbot.response",
    ChatbotUnavailable => "chatbot.unavailable",

    RegionalJa => "regional.ja",
    RegionalKo => "regional.ko",

    ErrorLocalTime => "error.local_time",
    ErrorEphemeris => "error.ephemeris",
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_paths_are_unique() {
        let paths: HashSet<&str> = MessageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(paths.len(), MessageKey::ALL.len());
    }

    #[test]
    fn test_parse_roundtrip() {
        for key in MessageKey::ALL {
            assert_eq!(key.as_str().parse::<MessageKey>().unwrap(), *key);
        }
        assert!("single.unknown".parse::<MessageKey>().is_err());
    }
}
