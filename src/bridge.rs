//! Runtime Bridge: the script embedded in every generated page.
//!
//! Inside an LMS iframe the page must find the host's SCORM runtime API
//! object and report status through it. Discovery is an ordered strategy
//! table: for each frame in the parent chain we probe the SCORM 2004 name
//! first, then the SCORM 1.2 name, ascending at most `MAX_FRAME_HOPS`
//! parents. When nothing is found the page runs in a degraded "no LMS"
//! mode where completion only shows a local acknowledgment.
//!
//! Per page load this is a two-state session: initialize on load, terminate
//! on completion or unload. "completed" is an attribute set while the
//! session is active, not a transport state of its own.

/// Ordered (global object name, version tag) probes, tried per frame.
pub const API_PROBES: &[(&str, &str)] = &[("API_1484_11", "2004"), ("API", "1.2")];

/// Parent-frame ascent bound; stops runaway walks when no host frame exists.
pub const MAX_FRAME_HOPS: u32 = 7;

/// Render the bridge as a `<script>`-body JS snippet.
pub fn runtime_bridge_script() -> String {
  let probes = API_PROBES
    .iter()
    .map(|(name, tag)| format!("[\"{}\", \"{}\"]", name, tag))
    .collect::<Vec<_>>()
    .join(", ");

  format!(
    r#"// SCORM API ile iletişim kurma
var SCORM_API_PROBES = [{probes}];
var MAX_FRAME_HOPS = {hops};
var scormApi = null;
var scormVersion = null;
var sessionActive = false;

function findScormApi(win) {{
  var frame = win;
  var hop = 0;
  while (frame) {{
    if (hop > MAX_FRAME_HOPS) {{
      return null;
    }}
    for (var i = 0; i < SCORM_API_PROBES.length; i++) {{
      var name = SCORM_API_PROBES[i][0];
      if (frame[name]) {{
        scormVersion = SCORM_API_PROBES[i][1];
        return frame[name];
      }}
    }}
    if (frame.parent && frame.parent != frame) {{
      frame = frame.parent;
      hop++;
    }} else {{
      break;
    }}
  }}
  return null;
}}

function scormSetValue(key, value) {{
  if (!scormApi) {{
    return false;
  }}
  if (scormVersion === "1.2") {{
    return scormApi.LMSSetValue(key, value);
  }}
  return scormApi.SetValue(key, value);
}}

function setCompletionStatus(status) {{
  if (scormVersion === "1.2") {{
    scormSetValue("cmi.core.lesson_status", status);
  }} else {{
    scormSetValue("cmi.completion_status", status);
  }}
}}

function initializeCommunication() {{
  scormApi = findScormApi(window);
  if (!scormApi) {{
    console.log("SCORM API bulunamadı - demo modunda çalışıyor");
    return;
  }}
  if (scormVersion === "1.2") {{
    scormApi.LMSInitialize("");
  }} else {{
    scormApi.Initialize("");
  }}
  sessionActive = true;
  setCompletionStatus("incomplete");
}}

function terminateCommunication() {{
  if (!scormApi || !sessionActive) {{
    return;
  }}
  if (scormVersion === "1.2") {{
    scormApi.LMSCommit("");
    scormApi.LMSFinish("");
  }} else {{
    scormApi.Commit("");
    scormApi.Terminate("");
  }}
  sessionActive = false;
}}

function markComplete() {{
  if (!scormApi) {{
    alert("İçerik tamamlandı! (SCORM API bulunamadı)");
    return;
  }}
  setCompletionStatus("completed");
  terminateCommunication();
  alert("Tebrikler! İçeriği tamamladınız.");
}}

window.addEventListener("load", initializeCommunication);
window.addEventListener("unload", terminateCommunication);
"#,
    probes = probes,
    hops = MAX_FRAME_HOPS,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn probe_order_is_2004_then_1_2() {
    assert_eq!(API_PROBES[0], ("API_1484_11", "2004"));
    assert_eq!(API_PROBES[1], ("API", "1.2"));
  }

  #[test]
  fn script_carries_hop_bound_and_probes() {
    let js = runtime_bridge_script();
    assert!(js.contains("var MAX_FRAME_HOPS = 7;"));
    assert!(js.contains(r#"["API_1484_11", "2004"], ["API", "1.2"]"#));
    // Degraded mode acknowledges locally instead of touching the API.
    assert!(js.contains("İçerik tamamlandı! (SCORM API bulunamadı)"));
  }

  #[test]
  fn session_lifecycle_hooks_are_wired() {
    let js = runtime_bridge_script();
    assert!(js.contains(r#"window.addEventListener("load", initializeCommunication);"#));
    assert!(js.contains(r#"window.addEventListener("unload", terminateCommunication);"#));
    assert!(js.contains(r#"setCompletionStatus("incomplete")"#));
    assert!(js.contains("cmi.core.lesson_status"));
    assert!(js.contains("cmi.completion_status"));
  }
}
