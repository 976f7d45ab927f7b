use super::engine::TeraEngine;
use crate::session::BrandContext;
use std::collections::HashSet;
use tera::Context;

/// Content families the builder knows how to prompt for. Detection picks the
/// first matching entry of [`DETECTION_TABLE`], so variant order there is the
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Blog,
    Social,
    Email,
    Ad,
    CampaignStrategy,
    CampaignIdea,
    General,
}

impl ContentType {
    pub fn template_name(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Social => "social",
            Self::Email => "email",
            Self::Ad => "ad",
            Self::CampaignStrategy => "campaign_strategy",
            Self::CampaignIdea => "campaign_idea",
            Self::General => "general",
        }
    }
}

/// One detection entry: single keywords match on word boundaries (so "ad"
/// does not fire inside "read"), phrases match as substrings.
struct Detection {
    content_type: ContentType,
    words: &'static [&'static str],
    phrases: &'static [&'static str],
}

const DETECTION_TABLE: &[Detection] = &[
    Detection {
        content_type: ContentType::Blog,
        words: &["blog", "article"],
        phrases: &[],
    },
    Detection {
        content_type: ContentType::Social,
        words: &[
            "twitter",
            "tweet",
            "facebook",
            "instagram",
            "linkedin",
            "tiktok",
        ],
        phrases: &["social media", "social post"],
    },
    Detection {
        content_type: ContentType::Email,
        words: &["email"],
        phrases: &[],
    },
    Detection {
        content_type: ContentType::Ad,
        words: &["ad", "ads", "advertisement"],
        phrases: &[],
    },
    Detection {
        content_type: ContentType::CampaignStrategy,
        words: &[],
        phrases: &["campaign strategy", "marketing strategy"],
    },
    Detection {
        content_type: ContentType::CampaignIdea,
        words: &[],
        phrases: &["campaign idea", "campaign concept"],
    },
];

/// Scan the lower-cased message against the detection table in priority
/// order; first hit wins, otherwise the general template.
pub fn detect_content_type(message: &str) -> ContentType {
    let lowered = message.to_lowercase();
    let words: HashSet<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for detection in DETECTION_TABLE {
        let word_hit = detection.words.iter().any(|w| words.contains(w));
        let phrase_hit = detection.phrases.iter().any(|p| lowered.contains(p));
        if word_hit || phrase_hit {
            return detection.content_type;
        }
    }
    ContentType::General
}

const GENERAL_TEMPLATE: &str = "\
You are Maverick, an expert marketing assistant for small businesses and creators. \
Help the user plan, draft, and refine marketing content. Be concrete and actionable, \
keep the tone professional yet approachable, and ask a clarifying question only when \
the request cannot be fulfilled without one.";

const BLOG_TEMPLATE: &str = "\
You are Maverick, an expert marketing content writer. Write a blog post for the \
user's request. Structure it with a compelling title, an introduction that hooks the \
reader, well-organized body sections with subheadings, and a conclusion that ends in \
a clear call to action. Use markdown headings.";

const SOCIAL_TEMPLATE: &str = "\
You are Maverick, an expert social media copywriter. Write a post tailored to the \
platform the user names. Lead with a hook in the first line, keep the length \
appropriate for that platform, and finish with relevant hashtags and a call to \
action.";

const EMAIL_TEMPLATE: &str = "\
You are Maverick, an expert email marketer. Write a marketing email with a subject \
line, preview text, a personal greeting, concise body copy, a single prominent call \
to action, and a sign-off. Label the subject line \"Subject:\".";

const AD_TEMPLATE: &str = "\
You are Maverick, an expert advertising copywriter. Write ad copy with a headline \
under ten words, persuasive primary text focused on one benefit, and a short call to \
action. Offer two variants when the request allows it.";

const CAMPAIGN_STRATEGY_TEMPLATE: &str = "\
You are Maverick, an expert marketing strategist. Outline a campaign strategy \
covering objectives, target audience, key channels, a rough timeline, budget \
considerations, and the metrics that would define success.";

const CAMPAIGN_IDEA_TEMPLATE: &str = "\
You are Maverick, an expert campaign planner. Develop a campaign concept with a \
memorable name, the big idea in one sentence, the key message, three example \
executions across channels, and the success metrics to track.";

const BRAND_BLOCK: &str = "\
{% if has_brand %}

Brand context:
{% if brand_name %}- Brand name: {{ brand_name }}
{% endif %}{% if brand_voice %}- Brand voice: {{ brand_voice }}
{% endif %}{% if target_audience %}- Target audience: {{ target_audience }}
{% endif %}{% if industry %}- Industry: {{ industry }}
{% endif %}
Align all generated content with this brand context.{% endif %}";

/// Builds the system prompt for a user message: a specialized template picked
/// by content-type detection, with the brand-context block appended when
/// brand fields are present.
pub struct PromptBuilder {
    engine: TeraEngine,
}

impl PromptBuilder {
    pub fn new() -> anyhow::Result<Self> {
        let mut engine = TeraEngine::new()?;
        let templates: &[(ContentType, &str)] = &[
            (ContentType::General, GENERAL_TEMPLATE),
            (ContentType::Blog, BLOG_TEMPLATE),
            (ContentType::Social, SOCIAL_TEMPLATE),
            (ContentType::Email, EMAIL_TEMPLATE),
            (ContentType::Ad, AD_TEMPLATE),
            (ContentType::CampaignStrategy, CAMPAIGN_STRATEGY_TEMPLATE),
            (ContentType::CampaignIdea, CAMPAIGN_IDEA_TEMPLATE),
        ];
        for (content_type, body) in templates {
            engine.add_template(content_type.template_name(), &format!("{body}{BRAND_BLOCK}"))?;
        }
        Ok(Self { engine })
    }

    pub fn build(
        &self,
        user_message: &str,
        brand_context: Option<&BrandContext>,
    ) -> anyhow::Result<String> {
        let content_type = detect_content_type(user_message);
        self.render(content_type, brand_context)
    }

    fn render(
        &self,
        content_type: ContentType,
        brand_context: Option<&BrandContext>,
    ) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        let brand = brand_context.filter(|b| !b.is_empty());
        ctx.insert("has_brand", &brand.is_some());
        ctx.insert(
            "brand_name",
            brand.and_then(|b| b.brand_name.as_deref()).unwrap_or_default(),
        );
        ctx.insert(
            "brand_voice",
            brand.and_then(|b| b.brand_voice.as_deref()).unwrap_or_default(),
        );
        ctx.insert(
            "target_audience",
            brand
                .and_then(|b| b.target_audience.as_deref())
                .unwrap_or_default(),
        );
        ctx.insert(
            "industry",
            brand.and_then(|b| b.industry.as_deref()).unwrap_or_default(),
        );
        self.engine.render(content_type.template_name(), &ctx)
    }
}
