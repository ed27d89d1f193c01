/// Application name
pub const APP_NAME: &str = "天父的信";

/// Topic catalogue served by `GET /api/topics`, in display order.
pub const TOPICS: [&str; 10] = [
    "工作 / 職場",
    "家庭 / 關係",
    "壓力 / 焦慮",
    "病痛 / 醫治",
    "供應 / 需要",
    "饒恕 / 和好",
    "方向 / 抉擇",
    "信心 / 盼望",
    "平安 / 安息",
    "感恩 / 敬拜",
];

/// Topic used when a generate request omits one
pub const DEFAULT_TOPIC: &str = "信心 / 盼望";

/// Recipient name used when a generate request omits one
pub const DEFAULT_NICKNAME: &str = "親愛的孩子";

/// Maximum number of letters kept in the mailbox file
pub const MAILBOX_CAPACITY: usize = 500;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 3000;

/// Default chat-completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API root
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.openai.com/v1";

/// Sampling temperature sent with every generation request
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Response-size ceiling (tokens) sent with every generation request
pub const GENERATION_MAX_TOKENS: u32 = 1200;

/// Instruction used when the base prompt file is missing or blank
pub const FALLBACK_BASE_PROMPT: &str =
    "請依照主題生成多維度卡片內容，並遵守下方的輸出格式要求。";

/// Field under which unparseable provider output is returned
pub const RAW_LETTER_FIELD: &str = "letter";
