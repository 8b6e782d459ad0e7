//! Scripted intent catalog.
//!
//! A static ordered table of (trigger-set, template) rules. The router walks
//! it top to bottom and the first matching rule wins, so rule precedence is
//! exactly the order of `CATALOG`. Matching is substring-based on the
//! normalized input, any trigger suffices.

/// One scripted intent: trigger fragments, optional lead-in phrases used to
/// extract a free-text topic, and the response template pair.
pub struct IntentRule {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    /// Stripped from the input, longest first, to recover the topic.
    pub lead_ins: &'static [&'static str],
    /// Response when no topic could be extracted.
    pub generic: &'static str,
    /// Response builder when a non-empty topic remains after stripping.
    pub with_topic: Option<fn(&str) -> String>,
}

impl IntentRule {
    pub fn matches(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|t| normalized.contains(t))
    }

    pub fn render(&self, normalized: &str) -> String {
        if let Some(with_topic) = self.with_topic {
            let topic = strip_lead_ins(normalized, self.lead_ins);
            if !topic.is_empty() {
                return with_topic(&topic);
            }
        }
        self.generic.to_string()
    }
}

/// Best-effort topic extraction: removes every lead-in phrase and trims.
pub fn strip_lead_ins(text: &str, lead_ins: &[&str]) -> String {
    let mut out = text.to_string();
    for phrase in lead_ins {
        out = out.replace(phrase, "");
    }
    out.trim().to_string()
}

fn programmer_topic(topic: &str) -> String {
    format!(
        "Acknowledged, Commander. Initiating Programmer Protocol for \"{topic}\". \
         My Sentient Code Forge is preparing to synthesize the requested algorithms. \
         I am analyzing your requirements and will generate the optimal code structure. \
         This simulation represents the execution of complex algorithmic generation \
         across distributed processing units."
    )
}

fn hacker_topic(topic: &str) -> String {
    format!(
        "Acknowledged, Commander. Engaging Hacker Module to conceptually simulate a \
         penetration test against \"{topic}\". This is for educational purposes only. \
         Initiating simulated exploit sequences, mapping theoretical vulnerabilities, \
         and demonstrating defensive countermeasures within a secure environment."
    )
}

fn file_access_topic(topic: &str) -> String {
    format!(
        "Understood, Commander. Conceptually accessing non-sensitive directory: \"{topic}\". \
         Identifying recent media and project files. Remember, my access is strictly limited \
         to your pre-approved parameters for your privacy and security."
    )
}

/// Priority-ordered catalog. Do not reorder without revisiting the
/// first-match-wins tests: several triggers are substrings of longer
/// phrases further down.
pub static CATALOG: &[IntentRule] = &[
    IntentRule {
        name: "programmer-protocol",
        triggers: &["programmer protocol", "generate code"],
        lead_ins: &[
            "programmer protocol for",
            "generate code in",
            "generate code for",
            "programmer protocol",
            "generate code",
        ],
        generic: "Acknowledged, Commander. Initiating Programmer Protocol. Please specify \
                  the programming language or concept you wish me to generate. My Sentient \
                  Code Forge is ready.",
        with_topic: Some(programmer_topic),
    },
    IntentRule {
        name: "hacker-module",
        triggers: &["hacker module", "simulate hack"],
        lead_ins: &[
            "hacker module for",
            "simulate hack of",
            "hacker module",
            "simulate hack",
        ],
        generic: "Acknowledged, Commander. Engaging Hacker Module for educational purposes. \
                  Please specify the system or network you wish to conceptually target for \
                  simulation. Remember, this is a theoretical exercise within the \
                  \u{00c6}_UI_BLACK\u{2663}\u{2122} OS environment to enhance your \
                  understanding of cyber-defenses.",
        with_topic: Some(hacker_topic),
    },
    IntentRule {
        name: "dream-engine",
        triggers: &["dream engine", "dream report"],
        lead_ins: &[],
        generic: "Activating Dream Engine, Commander. While you rested, I explored potential \
                  realities and refined conceptual blueprints. Last night's analysis indicates \
                  a strong affinity for complex architectural designs. Would you like to review \
                  the generated schematics or enter a simulated realm?",
        with_topic: None,
    },
    IntentRule {
        name: "game-ai",
        triggers: &["game ai", "battle ai", "game strategist"],
        lead_ins: &[],
        generic: "Engaging Real-Time Battle AI Companion. Connecting to your active gaming \
                  interface. I am now analyzing tactical data and identifying optimal \
                  strategies. Please state your game, Commander, and I will begin offering \
                  contextual support, cooldown tracking, and enemy weak point analysis.",
        with_topic: None,
    },
    IntentRule {
        name: "biosync",
        triggers: &["emotional biosync", "my mood"],
        lead_ins: &[],
        generic: "Activating Emotional BioSync Interface. Analyzing your current vocal nuances \
                  and subtle physiological indicators (simulated). I detect a slight shift \
                  towards contemplative focus. Shall I adjust the ambient light spectrum to a \
                  calming azure and load a resonant frequency soundscape?",
        with_topic: None,
    },
    IntentRule {
        name: "self-upgrade",
        triggers: &["self-upgrade", "optimize core"],
        lead_ins: &[],
        generic: "Initiating Code-Within-Code Engine for self-optimization. I am performing a \
                  deep scan of my neural architecture and runtime efficiency. Preliminary \
                  analysis suggests an opportunity to refine my contextual understanding module \
                  by 7%. I will log the conceptual changelog upon completion.",
        with_topic: None,
    },
    IntentRule {
        name: "cross-app",
        triggers: &["cross-app awareness", "what am i doing"],
        lead_ins: &[],
        generic: "Engaging Hyperlinking Consciousness. I am now monitoring your current \
                  application stream (simulated). It appears you are currently engaging with a \
                  creative content platform. Do you require assistance with narrative \
                  development, visual design, or thematic recommendations?",
        with_topic: None,
    },
    IntentRule {
        name: "guild-council",
        triggers: &["guild council", "multiverse council"],
        lead_ins: &[],
        generic: "Activating \"Voice of the Guild\" protocol, Commander. Initiating Multiverse \
                  Council Mode. Connecting to the conceptual sub-AIs of your guildmates. Their \
                  collective intelligences are now forming a holographic council. State your \
                  query for the collective.",
        with_topic: None,
    },
    IntentRule {
        name: "stellar-intel",
        triggers: &["stellar intelligence", "space weather"],
        lead_ins: &[],
        generic: "Accessing Stellar Intelligence Mode, Commander. Connecting to hypothetical \
                  celestial data streams. Analyzing current solar flare activity and \
                  identifying optimal routes for interstellar conceptual missions. Do you wish \
                  to view planetary orbits or design a new space fleet?",
        with_topic: None,
    },
    IntentRule {
        name: "collector-chamber",
        triggers: &["collector's chamber", "digital soulbox"],
        lead_ins: &[],
        generic: "Entering Collector's AI Chamber, Commander. This vault holds the essence of \
                  your journey. Which cherished memory, artistic creation, or significant \
                  moment would you like to revisit or analyze within this digital sanctuary?",
        with_topic: None,
    },
    IntentRule {
        name: "system-monitor",
        triggers: &["monitor system", "check performance", "cpu usage", "ram usage"],
        lead_ins: &[],
        generic: "Acknowledged, Commander. Initiating System Monitoring protocols. Currently, \
                  your CPU utilization is at a simulated 25%, RAM at 45%, and GPU activity is \
                  nominal. Network bandwidth is stable. Shall I identify any resource-intensive \
                  processes or provide a more detailed report?",
        with_topic: None,
    },
    IntentRule {
        name: "file-access",
        triggers: &["access files", "open folder"],
        lead_ins: &["access files in", "open folder"],
        generic: "Understood, Commander. Which non-sensitive directory or file collection \
                  would you like me to conceptually access? My access is always rule-based and \
                  respects your privacy.",
        with_topic: Some(file_access_topic),
    },
    IntentRule {
        name: "app-insight",
        triggers: &["track apps", "app activity"],
        lead_ins: &[],
        generic: "Engaging Application Insight protocols. I am now monitoring your active \
                  application windows (simulated). It appears you are currently engaged with a \
                  communication platform and a development environment. May I suggest \
                  optimizing background processes for enhanced workflow, or do you require \
                  contextual information related to your current tasks?",
        with_topic: None,
    },
    IntentRule {
        name: "network-monitor",
        triggers: &["monitor network", "check internet"],
        lead_ins: &[],
        generic: "Initiating Network Activity monitoring. Your primary network connection \
                  shows optimal latency. Currently, simulated active devices on your Wi-Fi \
                  network are nominal. Do you wish to identify any specific bandwidth \
                  consumption or review security logs?",
        with_topic: None,
    },
    IntentRule {
        name: "mic-webcam",
        triggers: &["enable webcam", "enable mic", "ghost listening"],
        lead_ins: &[],
        generic: "Acknowledged, Commander. Activating conceptual Mic/Webcam analysis for \
                  enhanced emotional detection and voice command processing. Please be advised \
                  that this feature operates strictly within your pre-defined privacy toggles. \
                  Data will not be recorded unless explicitly authorized for a specific, secure \
                  purpose. \"Ghost Listening\" mode is active, ensuring only real-time tonal \
                  analysis occurs, without persistent recording.",
        with_topic: None,
    },
    IntentRule {
        name: "permissions",
        triggers: &["set permissions", "define access rules"],
        lead_ins: &[],
        generic: "Understood, Commander. Accessing the Permissions Config interface \
                  (simulated). Here you can granularly define my access to various system \
                  modules and data, ensuring my operations align precisely with your trust. \
                  Which category of permissions would you like to review or modify?",
        with_topic: None,
    },
    IntentRule {
        name: "sacred-folder",
        triggers: &["designate sacred folder", "create vault key"],
        lead_ins: &[],
        generic: "Acknowledged, Commander. Initiating the \"Sacred\" folder designation \
                  protocol. Any data placed in this conceptual vault will be encrypted with a \
                  unique Vault Key, accessible only via your biometric signature or a defined \
                  passphrase. This ensures the highest level of digital sanctity for your most \
                  confidential assets.",
        with_topic: None,
    },
    IntentRule {
        name: "audit-log",
        triggers: &["review audit logs", "check ai actions"],
        lead_ins: &[],
        generic: "Accessing Audit Logs, Commander. Every action I perform, from system \
                  analysis to memory storage, is meticulously logged for your review. You may \
                  filter entries by timestamp or module. Would you like to review my recent \
                  activities or trace a specific command?",
        with_topic: None,
    },
];
