//! Server-side page rendering. One page: sidebar settings, word form, result, history, tips,
//! example words. Everything user-supplied or generated goes through `html_escape`.

use humor_core::{
    credential_guidance, HumorLevel, InterpretationRecord, InterpretationStyle, Notice,
    NoticeKind, EXAMPLE_WORDS, MISSING_CREDENTIAL_MESSAGE,
};

const PAGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/page.html"));

/// Everything the page needs for one response.
#[derive(Debug, Default)]
pub struct PageView {
    /// No credential resolved: only the sidebar key form and guidance are shown.
    pub gated: bool,
    /// Environment variable the fallback credential is read from, named in the guidance.
    pub credential_env_var: String,
    /// Masked tail of the sidebar credential, when the user entered one.
    pub stored_credential: Option<String>,
    pub word: String,
    pub humor_level: HumorLevel,
    pub style: InterpretationStyle,
    pub result: Option<InterpretationRecord>,
    pub notice: Option<Notice>,
    /// Most recent first, already capped.
    pub history: Vec<InterpretationRecord>,
}

pub fn page(view: &PageView) -> String {
    let mut body = String::new();
    body.push_str(&sidebar(view));
    body.push_str(r#"<main class="main">"#);
    body.push_str(r#"<h1 class="main-header">😄 한글 단어 유머 해석기</h1>"#);

    if view.gated {
        body.push_str(&gated_notice(&view.credential_env_var));
    } else {
        body.push_str(&word_form(view));
        if let Some(notice) = &view.notice {
            body.push_str(&notice_block(notice));
        }
        if let Some(record) = &view.result {
            body.push_str(&result_card(record));
        }
        body.push_str(&history_section(&view.history));
        body.push_str(TIPS);
        body.push_str(&example_words());
    }

    body.push_str(FOOTER);
    body.push_str("</main>");
    PAGE.replace("{{body}}", &body)
}

fn sidebar(view: &PageView) -> String {
    let placeholder = match &view.stored_credential {
        Some(masked) => format!("저장됨: {}", masked),
        None => "sk-...".to_string(),
    };
    let mut out = format!(
        r#"<aside class="sidebar">
<h2>🔑 API 설정</h2>
<form method="post" action="/credential">
  <label for="api_key">OpenAI API 키</label>
  <input id="api_key" type="password" name="api_key" placeholder="{}" title="OpenAI API 키를 입력하세요" autocomplete="off">
  <button type="submit">저장</button>
</form>"#,
        html_escape(&placeholder)
    );

    if !view.gated {
        out.push_str(r#"<h2>⚙️ 해석 설정</h2><label for="humor_level">유머 수준</label>"#);
        out.push_str(r#"<select id="humor_level" name="humor_level" form="interpret-form" title="해석의 유머 수준을 선택하세요">"#);
        for level in HumorLevel::ALL {
            out.push_str(&option(level.label(), level == view.humor_level));
        }
        out.push_str(r#"</select><label for="style">해석 스타일</label>"#);
        out.push_str(r#"<select id="style" name="style" form="interpret-form" title="어떤 스타일로 해석할지 선택하세요">"#);
        for style in InterpretationStyle::ALL {
            out.push_str(&option(style.label(), style == view.style));
        }
        out.push_str("</select>");
        out.push_str(
            r#"<form method="post" action="/session/reset"><button type="submit">🔄 세션 초기화</button></form>"#,
        );
    }

    out.push_str("</aside>");
    out
}

fn option(label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{0}"{1}>{0}</option>"#,
        html_escape(label),
        if selected { " selected" } else { "" }
    )
}

fn gated_notice(credential_env_var: &str) -> String {
    let steps: String = credential_guidance(credential_env_var)
        .iter()
        .map(|s| format!("<li>{}</li>", html_escape(s)))
        .collect();
    format!(
        r#"<div class="notice notice-error">{}</div>
<div class="notice notice-info"><h3>🔑 API 키 설정 방법:</h3><ol>{}</ol></div>"#,
        MISSING_CREDENTIAL_MESSAGE, steps
    )
}

fn word_form(view: &PageView) -> String {
    let mut out = format!(
        r#"<h2>📝 단어 입력</h2>
<form id="interpret-form" method="post" action="/interpret">
  <label for="word">해석할 한글 단어를 입력하세요</label>
  <input id="word" type="text" name="word" value="{}" placeholder="예: 사과, 컴퓨터, 바람, 꿈..." title="한글 단어를 입력하면 유머러스하게 해석해드립니다!">
  <button class="primary" type="submit">😄 유머러스하게 해석하기</button>
</form>"#,
        html_escape(&view.word)
    );
    if !view.word.trim().is_empty() {
        out.push_str(&format!(
            r#"<div class="word-card"><h2>🎯 입력된 단어: <strong>{}</strong></h2></div>"#,
            html_escape(view.word.trim())
        ));
    }
    out
}

fn notice_block(notice: &Notice) -> String {
    let class = match notice.kind {
        NoticeKind::Success => "notice-success",
        NoticeKind::Info => "notice-info",
        NoticeKind::Error => "notice-error",
    };
    let mut out = format!(
        r#"<div class="notice {}">{}</div>"#,
        class,
        html_escape(&notice.message)
    );
    if let Some(hint) = &notice.hint {
        out.push_str(&format!(
            r#"<div class="notice notice-info">{}</div>"#,
            html_escape(hint)
        ));
    }
    out
}

fn result_card(record: &InterpretationRecord) -> String {
    format!(
        r#"<div class="interpretation-card"><h3>🎭 유머러스한 해석 결과</h3>{}</div>"#,
        html_escape(record.text())
    )
}

fn history_section(history: &[InterpretationRecord]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<section id="history"><h2>📚 해석 히스토리</h2>"#);
    for item in history {
        out.push_str(&format!(
            r#"<details class="history-entry"><summary>📝 {word} - {ts}</summary>
<p><strong>단어:</strong> {word}</p>
<p><strong>유머 수준:</strong> {level}</p>
<p><strong>해석 스타일:</strong> {style}</p>
<p><strong>해석 결과:</strong></p>
<p>{text}</p></details>"#,
            word = html_escape(item.word()),
            ts = html_escape(item.timestamp()),
            level = item.humor_level(),
            style = item.style(),
            text = html_escape(item.text()),
        ));
    }
    out.push_str(
        r#"<form method="post" action="/history/clear"><button type="submit">🗑️ 히스토리 초기화</button></form></section>"#,
    );
    out
}

const TIPS: &str = r#"<h2>💡 재미있는 팁</h2>
<div class="fun-fact">
<h4>🎯 이 앱의 특징:</h4>
<ul>
<li>🤖 언어 모델을 사용한 창의적 해석</li>
<li>😄 다양한 유머 수준과 해석 스타일 선택 가능</li>
<li>📚 해석 히스토리 저장 및 관리</li>
<li>🎨 아름다운 UI/UX 디자인</li>
</ul>
</div>"#;

/// Example buttons only fill the word field (plain GET with `?word=`).
fn example_words() -> String {
    let buttons: String = EXAMPLE_WORDS
        .iter()
        .map(|w| format!(r#"<button type="submit" name="word" value="{0}">{0}</button>"#, w))
        .collect();
    format!(
        r#"<h2>🎲 재미있는 예시 단어들</h2><form method="get" action="/" class="examples">{}</form>"#,
        buttons
    )
}

const FOOTER: &str = r#"<footer><p>😄 한글 단어 유머 해석기 | OpenAI 기반</p></footer>"#;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
