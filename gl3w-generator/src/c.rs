use std::io;

use crate::Command;

pub const UNLICENSE: &str = r#"/*

    This file was generated with gl3w-gen, part of gl3w
    (hosted at https://github.com/skaslev/gl3w)

    This is free and unencumbered software released into the public domain.

    Anyone is free to copy, modify, publish, use, compile, sell, or
    distribute this software, either in source code form or as a compiled
    binary, for any purpose, commercial or non-commercial, and by any
    means.

    In jurisdictions that recognize copyright laws, the author or authors
    of this software dedicate any and all copyright interest in the
    software to the public domain. We make this dedication for the benefit
    of the public at large and to the detriment of our heirs and
    successors. We intend this dedication to be an overt act of
    relinquishment in perpetuity of all present and future rights to this
    software under copyright law.

    THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
    EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
    MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
    IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR ANY CLAIM, DAMAGES OR
    OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE,
    ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR
    OTHER DEALINGS IN THE SOFTWARE.

*/

"#;

const HEADER_PREAMBLE: &str = r#"#ifndef __gl3w_h_
#define __gl3w_h_

#include <GL/glcorearb.h>

#ifndef __gl_h_
#define __gl_h_
#endif

typedef void (*GL3WglProc)(void);

/* gl3w API: */
int gl3wInit(void);
void gl3wShutdown(void);
int gl3wIsSupported(int major, int minor);
GL3WglProc gl3wGetProcAddress(const char *proc);

/* OpenGL functions: */
"#;

const HEADER_EPILOGUE: &str = r#"
#endif // __gl3w_h_
"#;

const SEPARATOR: &str =
    "/* --------------------------------------------------------------------------------------------- */\n";

// NOTE: each platform section provides the same three private functions: gl3w_open_libgl,
// gl3w_close_libgl and gl3w_fn.
const SOURCE_PLATFORMS: &str = r#"#include <GL/gl3w.h>

/* --------------------------------------------------------------------------------------------- */

#ifdef _WIN32

/* ------------------------------------
 * Windows
 * ------------------------------------ */

#define WIN32_LEAN_AND_MEAN 1
#include <windows.h>

static HMODULE gl3w_libgl = NULL;

static int gl3w_open_libgl(void)
{
    if (!gl3w_libgl)
    {
        gl3w_libgl = LoadLibraryA("opengl32.dll");
    }

    return gl3w_libgl != NULL;
}

static void gl3w_close_libgl(void)
{
    if (gl3w_libgl)
    {
        FreeLibrary(gl3w_libgl);
        gl3w_libgl = NULL;
    }
}

static GL3WglProc gl3w_fn(const char *proc)
{
    GL3WglProc res;
    INT_PTR sentinel;

    res = (GL3WglProc) wglGetProcAddress(proc);
    sentinel = (INT_PTR) res;

    /* some drivers report failure with 1, 2, 3 or -1 instead of NULL */
    if (sentinel == 1 || sentinel == 2 || sentinel == 3 || sentinel == -1)
    {
        res = NULL;
    }

    if (!res)
    {
        res = (GL3WglProc) GetProcAddress(gl3w_libgl, proc);
    }

    return res;
}

#elif defined(__APPLE__) || defined(__APPLE_CC__)

/* ------------------------------------
 * Mac OS
 * ------------------------------------ */

#include <Carbon/Carbon.h>

static CFBundleRef gl3w_cfBundle = NULL;
static CFURLRef gl3w_cfBundleURL = NULL;

static int gl3w_open_libgl(void)
{
    if (gl3w_cfBundle)
    {
        return 1;
    }

    gl3w_cfBundleURL = CFURLCreateWithFileSystemPath(
                            kCFAllocatorDefault,
                            CFSTR("/System/Library/Frameworks/OpenGL.framework"),
                            kCFURLPOSIXPathStyle, true);
    if (!gl3w_cfBundleURL)
    {
        return 0;
    }

    gl3w_cfBundle = CFBundleCreate(kCFAllocatorDefault, gl3w_cfBundleURL);
    if (!gl3w_cfBundle)
    {
        CFRelease(gl3w_cfBundleURL);
        gl3w_cfBundleURL = NULL;
        return 0;
    }

    return 1;
}

static void gl3w_close_libgl(void)
{
    if (gl3w_cfBundle)
    {
        CFRelease(gl3w_cfBundle);
        gl3w_cfBundle = NULL;
    }
    if (gl3w_cfBundleURL)
    {
        CFRelease(gl3w_cfBundleURL);
        gl3w_cfBundleURL = NULL;
    }
}

static GL3WglProc gl3w_fn(const char *proc)
{
    GL3WglProc res;
    CFStringRef name;

    if (!gl3w_cfBundle)
    {
        return NULL;
    }

    name = CFStringCreateWithCString(kCFAllocatorDefault, proc, kCFStringEncodingASCII);
    res = (GL3WglProc) CFBundleGetFunctionPointerForName(gl3w_cfBundle, name);
    CFRelease(name);

    return res;
}

#else

/* ------------------------------------
 * GLX
 * ------------------------------------ */

#include <dlfcn.h>
#include <GL/glx.h>

static void *gl3w_libgl = NULL;

static int gl3w_open_libgl(void)
{
    if (!gl3w_libgl)
    {
        gl3w_libgl = dlopen("libGL.so.1", RTLD_LAZY | RTLD_GLOBAL);
    }

    return gl3w_libgl != NULL;
}

static void gl3w_close_libgl(void)
{
    if (gl3w_libgl)
    {
        dlclose(gl3w_libgl);
        gl3w_libgl = NULL;
    }
}

static GL3WglProc gl3w_fn(const char *proc)
{
    GL3WglProc res;

    res = (GL3WglProc) glXGetProcAddress((const GLubyte *) proc);

    if (!res && gl3w_libgl)
    {
        res = (GL3WglProc) dlsym(gl3w_libgl, proc);
    }

    return res;
}

#endif
"#;

// NOTE: gl3w_version stays zero until gl3wInit succeeds, so gl3wIsSupported answers no before
// that.
const SOURCE_API: &str = r#"
/* ------------------------------------
 * GL3W API
 * ------------------------------------ */

static struct {
    int major, minor;
} gl3w_version;

static void gl3w_load_all_functions(void);

static int gl3w_parse_version(void)
{
    int major = 0, minor = 0;

    if (!glGetIntegerv)
    {
        return 0;
    }

    glGetIntegerv(GL_MAJOR_VERSION, &major);
    glGetIntegerv(GL_MINOR_VERSION, &minor);

    if (major < 3)
    {
        return 0;
    }

    gl3w_version.major = major;
    gl3w_version.minor = minor;
    return 1;
}

int gl3wInit(void)
{
    gl3w_version.major = 0;
    gl3w_version.minor = 0;

    if (!gl3w_open_libgl())
    {
        return 0;
    }

    gl3w_load_all_functions();
    return gl3w_parse_version();
}

void gl3wShutdown(void)
{
    gl3w_close_libgl();
    gl3w_version.major = 0;
    gl3w_version.minor = 0;
}

int gl3wIsSupported(int major, int minor)
{
    if (major < 3)
    {
        return 0;
    }
    if (gl3w_version.major == major)
    {
        return gl3w_version.minor >= minor;
    }
    return gl3w_version.major >= major;
}

GL3WglProc gl3wGetProcAddress(const char *proc)
{
    if (!proc)
    {
        return NULL;
    }
    return gl3w_fn(proc);
}

"#;

/// writes `gl3w.h`: the api, one `extern` pointer per command and one `#define` that redirects
/// the standard name to it.
pub fn emit_header<W: io::Write>(w: &mut W, commands: &[Command]) -> anyhow::Result<()> {
    w.write_all(UNLICENSE.as_bytes())?;
    w.write_all(HEADER_PREAMBLE.as_bytes())?;
    for cmd in commands.iter() {
        write!(w, "extern {:<52} {};\n", cmd.pointer_type(), cmd.pointer_name())?;
    }
    write!(w, "\n")?;
    for cmd in commands.iter() {
        write!(w, "#define {:<51} {}\n", cmd.name, cmd.pointer_name())?;
    }
    w.write_all(HEADER_EPILOGUE.as_bytes())?;
    Ok(())
}

/// writes `gl3w.cpp`: the platform shim, the api, the pointer definitions and
/// `gl3w_load_all_functions`.
pub fn emit_source<W: io::Write>(w: &mut W, commands: &[Command]) -> anyhow::Result<()> {
    w.write_all(UNLICENSE.as_bytes())?;
    w.write_all(SOURCE_PLATFORMS.as_bytes())?;
    w.write_all(SOURCE_API.as_bytes())?;
    w.write_all(SEPARATOR.as_bytes())?;
    write!(w, "\n")?;
    for cmd in commands.iter() {
        write!(w, "{:<52} {};\n", cmd.pointer_type(), cmd.pointer_name())?;
    }
    write!(w, "\n")?;
    w.write_all(SEPARATOR.as_bytes())?;
    write!(w, "\nstatic void gl3w_load_all_functions(void)\n{{\n")?;
    for cmd in commands.iter() {
        write!(
            w,
            "\t{:<47} = ( {:<52} ) gl3w_fn(\"{}\");\n",
            cmd.pointer_name(),
            cmd.pointer_type(),
            cmd.name,
        )?;
    }
    write!(w, "}}\n")?;
    Ok(())
}
