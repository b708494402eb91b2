use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

/// GET paths worth clicking through, including the ones that fail.
pub const LINKS: &[&str] = &[
    "/hello",
    "/env",
    "/dontexist",
    "/query?aa=000&bb=111",
    "/splat/aaa",
    "/splat/aaa/bbb",
    "/splat/aaa/bbb/ccc",
    "/check-helper-1/aa",
    "/check-helper-2/bb",
    "/check-helper-1/ccc",
    "/check-helper-2/ddd",
    "/error",
    "/error/custom-handler",
    "/error/code/404",
    "/error/code/505",
    "/error/code/606",
    "/mailgun",
];

pub fn index() -> HttpResponse {
    let items: String = LINKS
        .iter()
        .map(|link| {
            let link = htmlescape::encode_minimal(link);
            format!("<li><a href=\"{0}\">{0}</a></li>\n", link)
        })
        .collect();

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Min sane</title>
</head>
<body>
<ul>
{items}</ul>
</body>
</html>
"#,
            items = items
        ))
}
