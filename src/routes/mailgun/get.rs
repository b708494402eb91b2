use crate::domain::Provider;
use actix_web::http::header::ContentType;
use actix_web::HttpResponse;

pub fn mail_form() -> HttpResponse {
    let options = Provider::ALL
        .iter()
        .map(|provider| format!(r#"<option value="{0}">{0}</option>"#, provider))
        .collect::<Vec<_>>()
        .join("\n        ");

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
<form action="/mailgun" method="post">
    <input type="email" name="to" placeholder="To email"><br>
    <input type="text" name="title" placeholder="Title"><br>
    <input type="password" name="password" placeholder="Password"><br>
    <select name="provider">
        {options}
    </select><br>
    <textarea name="body" rows="5">Body

of email</textarea><br>
    <input type="submit" value="Send email">
</form>
</body>
</html>
"#,
            options = options
        ))
}
