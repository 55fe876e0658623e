// Web-Modul für den Setup-Server der Provisionierung

pub mod protocol;

/// Setup-Seite, direkt ins Binary eingebettet
///
/// Das Formular wird per fetch() gesendet, damit die JSON-Antwort
/// auf der Seite angezeigt werden kann.
pub const SETUP_HTML: &str = r#"<!DOCTYPE html>
<html lang="de">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>amclock Setup</title>
<style>
body { font-family: sans-serif; max-width: 24rem; margin: 2rem auto; padding: 0 1rem; }
label { display: block; margin-top: 1rem; }
input { width: 100%; padding: .5rem; box-sizing: border-box; }
button { margin-top: 1.5rem; padding: .6rem 1.2rem; }
#result { margin-top: 1rem; }
</style>
</head>
<body>
<h1>amclock Setup</h1>
<p id="device"></p>
<form id="setup" method="post" action="/provision">
<label>WLAN (SSID)<input name="ssid" maxlength="32" required></label>
<label>Passwort<input name="password" type="password" maxlength="64"></label>
<button type="submit">Speichern</button>
</form>
<p id="result"></p>
<script>
fetch('/status').then(r => r.json()).then(s => {
  document.getElementById('device').textContent = s.hostname + ' (v' + s.version + ')';
});
document.getElementById('setup').addEventListener('submit', async (e) => {
  e.preventDefault();
  const body = new URLSearchParams(new FormData(e.target));
  const res = await fetch('/provision', { method: 'POST', body });
  const reply = await res.json();
  document.getElementById('result').textContent = reply.message;
});
</script>
</body>
</html>
"#;
