//! Fixed JS snippets evaluated against third-party pages.
//!
//! Both page contracts here are external, unversioned, and may drift
//! without notice; every snippet degrades to "nothing found" when the
//! markup no longer matches.

/// Extract `{code, messageId}` pairs from a Telegram Web channel page.
///
/// A message counts when it carries a numeric `data-message-id`, its text
/// contains the `Code:` marker, and it embeds a code token element.
pub const EXTRACT_CODES: &str = r##"
(() => {
    const results = [];
    for (const msg of document.querySelectorAll(".Message")) {
        const idAttr = msg.getAttribute("data-message-id");
        if (!idAttr) continue;
        const messageId = parseInt(idAttr, 10);
        if (!Number.isFinite(messageId)) continue;
        const text = msg.querySelector(".text-content");
        if (!text || !text.textContent.includes("Code:")) continue;
        const codeEl = msg.querySelector(".text-entity-code");
        if (!codeEl) continue;
        const code = codeEl.textContent.trim();
        if (code) results.push({ code: code, messageId: messageId });
    }
    return results;
})()
"##;

/// Exact-attribute match on the claim dialog's submit button.
pub const CONFIRM_BY_ATTRIBUTE: &str = r##"
(() => {
    const btn = document.querySelector('button[type="submit"][data-testid="claim-bonus"]');
    if (btn && !btn.disabled) { btn.click(); return true; }
    return false;
})()
"##;

/// Exact visible-text match, case-insensitive.
pub const CONFIRM_BY_TEXT: &str = r##"
(() => {
    for (const btn of document.querySelectorAll("button")) {
        if (btn.disabled) continue;
        if (btn.textContent.trim().toLowerCase() === "claim bonus") {
            btn.click();
            return true;
        }
    }
    return false;
})()
"##;

/// Loose heuristic: first enabled button that is not the dismiss control.
pub const CONFIRM_FALLBACK: &str = r##"
(() => {
    const isDismiss = (btn) => {
        const label = ((btn.getAttribute("aria-label") || "") + " " + btn.textContent).toLowerCase();
        return label.includes("dismiss");
    };
    for (const btn of document.querySelectorAll("button")) {
        if (btn.disabled || isDismiss(btn)) continue;
        btn.click();
        return true;
    }
    return false;
})()
"##;

/// Confirmation strategies, tried in order until one clicks.
pub const CONFIRM_STRATEGIES: &[(&str, &str)] = &[
    ("attribute", CONFIRM_BY_ATTRIBUTE),
    ("text", CONFIRM_BY_TEXT),
    ("fallback", CONFIRM_FALLBACK),
];
