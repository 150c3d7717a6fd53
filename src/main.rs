use bbmark::{BbCode, TagDef, TagSet};
use std::io::{self, Read};

fn default_tags() -> TagSet {
    TagSet::new()
        .with("b", "<strong>{content}</strong>")
        .with("i", "<em>{content}</em>")
        .with("u", "<u>{content}</u>")
        .with("s", "<s>{content}</s>")
        .with(
            "url",
            TagDef::callback(|tag| {
                let href = tag.option().unwrap_or(tag.content());
                format!("<a href=\"{}\">{}</a>", href, tag.content())
            }),
        )
        .with("img", "<img src=\"{content}\" alt=\"{option}\" />")
        .with("color", "<span style=\"color: {option}\">{content}</span>")
        .with("quote", "<blockquote>{content}</blockquote>")
        .with(
            "code",
            TagDef::template("<pre><code>{content}</code></pre>").no_code(),
        )
        .with("hr", TagDef::template("<hr />").self_closing())
}

fn main() {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .expect("Failed to read stdin");
    let output = BbCode::new(default_tags()).render(&input);
    print!("{}", output);
}
